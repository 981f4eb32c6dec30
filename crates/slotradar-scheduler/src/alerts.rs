//! Pending alert queue — one entry per client, first-come order.
//!
//! The queue itself has no side effects; the radar engine stops the
//! notification channels when an operation leaves it empty.

use std::collections::VecDeque;

use serde::Serialize;

/// A client that needs a manual portal check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAlert {
    /// Owning client id; at most one alert per client.
    pub id: String,
    pub name: String,
    pub destination: String,
}

#[derive(Debug, Default)]
pub struct AlertQueue {
    queue: VecDeque<PendingAlert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.queue.iter().any(|a| a.id == id)
    }

    /// Append unless an alert with the same id is already queued.
    /// Returns whether the alert was added.
    pub fn enqueue_if_absent(&mut self, alert: PendingAlert) -> bool {
        if self.contains(&alert.id) {
            return false;
        }
        tracing::debug!("📥 Alert queued: {} ({})", alert.name, alert.id);
        self.queue.push_back(alert);
        true
    }

    /// Remove by id. Unknown ids are a no-op and return `None`.
    pub fn acknowledge(&mut self, id: &str) -> Option<PendingAlert> {
        let idx = self.queue.iter().position(|a| a.id == id)?;
        self.queue.remove(idx)
    }

    /// Drop the alert for a client whose record was just checked.
    pub fn on_record_checked(&mut self, client_id: &str) -> bool {
        self.acknowledge(client_id).is_some()
    }

    pub fn clear_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAlert> {
        self.queue.iter()
    }

    pub fn snapshot(&self) -> Vec<PendingAlert> {
        self.queue.iter().cloned().collect()
    }
}
