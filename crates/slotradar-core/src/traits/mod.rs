//! Ports between the radar core and the outside world.

pub mod host;
pub mod source;

pub use host::{Beep, Host, HostNotification, ToneSequence};
pub use source::{RadarSink, RecordChecked, RecordSource};
