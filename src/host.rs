//! Terminal implementation of the host port: OSC title, terminal bell,
//! log-line notifications.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use slotradar_core::{Host, HostNotification, RadarError, Result, ToneSequence};
use tokio::task::JoinHandle;

/// Gap between bells while the alert sound loops.
const BELL_LOOP: Duration = Duration::from_secs(2);

pub struct TerminalHost {
    notifications: bool,
    sound: Mutex<Option<JoinHandle<()>>>,
}

impl TerminalHost {
    pub fn new(notifications: bool) -> Self {
        Self {
            notifications,
            sound: Mutex::new(None),
        }
    }
}

fn bell() {
    let mut out = std::io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

fn runtime() -> Result<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current()
        .map_err(|_| RadarError::Host("no async runtime to drive audio".into()))
}

impl Host for TerminalHost {
    fn request_notification_permission(&self) -> bool {
        self.notifications
    }

    fn show_notification(&self, notification: &HostNotification) -> Result<()> {
        tracing::info!("🔔 {}: {}", notification.title, notification.body);
        Ok(())
    }

    fn play_looping_sound(&self, volume: f32) -> Result<()> {
        let rt = runtime()?;
        let mut slot = self.sound.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return Ok(());
        }
        tracing::debug!("🔊 Bell loop (volume {volume:.2} ignored by terminal)");
        *slot = Some(rt.spawn(async {
            loop {
                bell();
                tokio::time::sleep(BELL_LOOP).await;
            }
        }));
        Ok(())
    }

    fn stop_sound(&self) {
        if let Some(handle) = self.sound.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }

    fn play_tone(&self, tone: &ToneSequence) -> Result<()> {
        let rt = runtime()?;
        let offsets: Vec<Duration> = tone.beeps.iter().map(|b| b.offset).collect();
        rt.spawn(async move {
            let start = tokio::time::Instant::now();
            for offset in offsets {
                tokio::time::sleep_until(start + offset).await;
                bell();
            }
        });
        Ok(())
    }

    fn set_display_title(&self, title: &str) {
        let mut out = std::io::stdout();
        let _ = write!(out, "\x1b]0;{title}\x07");
        let _ = out.flush();
    }

    fn show_banner(&self, text: &str) {
        println!("\n  {text}\n");
    }

    fn dismiss_banner(&self) {
        tracing::debug!("Banner dismissed");
    }
}
