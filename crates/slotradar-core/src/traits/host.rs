//! Host capability port — title text, audio and system notifications.
//!
//! Everything that touches the operator's desktop goes through [`Host`], so
//! the radar and alarm loops can run against a fake in tests.

use std::time::Duration;

use crate::error::Result;

/// A transient system notification.
#[derive(Debug, Clone, PartialEq)]
pub struct HostNotification {
    pub title: String,
    pub body: String,
    /// Bring the host window to the front when the notification is clicked.
    pub focus_on_click: bool,
}

/// One beep of a tone sequence: a frequency sweep with exponential decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beep {
    /// Delay from the start of the sequence.
    pub offset: Duration,
    pub start_hz: f32,
    pub end_hz: f32,
    pub decay: Duration,
}

/// A one-shot tone, played on a channel separate from the looping alert sound.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    pub beeps: Vec<Beep>,
}

impl ToneSequence {
    /// Three rising beeps, 440→880 Hz, 0.5s decay, 0.6s apart.
    pub fn alarm() -> Self {
        let beeps = (0..3u64)
            .map(|i| Beep {
                offset: Duration::from_millis(600 * i),
                start_hz: 440.0,
                end_hz: 880.0,
                decay: Duration::from_millis(500),
            })
            .collect();
        Self { beeps }
    }

    /// Total playback length.
    pub fn duration(&self) -> Duration {
        self.beeps
            .iter()
            .map(|b| b.offset + b.decay)
            .max()
            .unwrap_or_default()
    }
}

/// Desktop side effects the core needs from its host.
///
/// Implementations must tolerate repeated calls; the multiplexer guards
/// idempotency on its side but hosts should not panic on a redundant stop.
pub trait Host: Send + Sync {
    /// Ask once for permission to show system notifications.
    fn request_notification_permission(&self) -> bool;

    fn show_notification(&self, notification: &HostNotification) -> Result<()>;

    /// Start the looping alert sound. May fail when playback is blocked.
    fn play_looping_sound(&self, volume: f32) -> Result<()>;

    /// Stop the looping sound and rewind it to the start.
    fn stop_sound(&self);

    fn play_tone(&self, tone: &ToneSequence) -> Result<()>;

    fn set_display_title(&self, title: &str);

    /// In-app banner; the caller dismisses it.
    fn show_banner(&self, text: &str);

    fn dismiss_banner(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_tone_shape() {
        let tone = ToneSequence::alarm();
        assert_eq!(tone.beeps.len(), 3);
        assert_eq!(tone.beeps[1].offset, Duration::from_millis(600));
        assert_eq!(tone.beeps[2].offset, Duration::from_millis(1200));
        assert!(tone.beeps.iter().all(|b| b.start_hz == 440.0 && b.end_hz == 880.0));
        assert_eq!(tone.duration(), Duration::from_millis(1700));
    }
}
