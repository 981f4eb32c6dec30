//! # SlotRadar Scheduler
//!
//! Decides which pending applications need a manual portal re-check, queues
//! them as alerts and keeps the operator's attention until each one is
//! acknowledged. A sibling alarm clock fires one-shot work reminders.
//!
//! ## Architecture
//! ```text
//! RadarScheduler (tokio interval, 10s)
//!   ├── time_format: "last checked" → elapsed tier
//!   ├── urgency: target window + opening-log pattern → score
//!   ├── frequency: priority mode + score → re-check interval
//!   └── due records → AlertQueue → NotificationMultiplexer
//!                                    ├── looping sound
//!                                    ├── system notification
//!                                    └── blinking title
//!
//! AlarmClock (tokio interval, 5s)
//!   └── "HH:MM" hit → tone + banner + notification (one-shot)
//!
//! Cockpit: urgency + staleness ordering for single-focus review
//! ```

pub mod alarm;
pub mod alerts;
pub mod cockpit;
pub mod engine;
pub mod frequency;
pub mod notify;
pub mod store;
pub mod time_format;
pub mod urgency;

#[cfg(test)]
pub(crate) mod testing;

pub use alarm::{AlarmBook, AlarmClock, AlarmTime};
pub use alerts::{AlertQueue, PendingAlert};
pub use cockpit::{Cockpit, CockpitEntry};
pub use engine::{RadarEngine, RadarScheduler, TickReport};
pub use frequency::interval_minutes;
pub use notify::{NotificationMultiplexer, NotifySettings};
pub use store::JsonStore;
pub use time_format::{DisplayTier, Elapsed, ParsedTimestamp};
pub use urgency::UrgencyResult;
