//! # SlotRadar Core
//! Shared data model, configuration, error type and the ports the
//! scheduling core talks through (host capabilities, record collaborator).

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::{RadarError, Result};
pub use traits::{Host, HostNotification, RadarSink, RecordChecked, RecordSource, ToneSequence};
pub use types::{MonitorableRecord, OpeningLogEntry, PriorityMode, RecordStatus};
