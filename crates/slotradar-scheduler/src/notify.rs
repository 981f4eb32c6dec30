//! Notification fan-out — looping sound, system notification, blinking title.
//! Every channel is individually idempotent, so the radar can call
//! [`NotificationMultiplexer::trigger`] on every tick without tracking
//! whether it is already alerting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slotradar_core::config::NotifyConfig;
use slotradar_core::{Host, HostNotification};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub volume: f32,
    pub blink_interval: Duration,
    pub neutral_title: String,
    pub system_notifications: bool,
}

impl Default for NotifySettings {
    fn default() -> Self {
        (&NotifyConfig::default()).into()
    }
}

impl From<&NotifyConfig> for NotifySettings {
    fn from(config: &NotifyConfig) -> Self {
        Self {
            volume: config.sound_volume.clamp(0.0, 1.0),
            blink_interval: Duration::from_millis(config.blink_interval_ms.max(1)),
            neutral_title: config.neutral_title.clone(),
            system_notifications: config.system_notifications,
        }
    }
}

/// Title shown on the "lit" half of the blink cycle.
pub fn alert_title(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("🔔 ({count}) check{plural} due")
}

struct BlinkCycle {
    handle: JoinHandle<()>,
    /// Cleared under the lock before the task is aborted, so a title write
    /// in flight can never land after `stop()` restores the neutral title.
    live: Arc<Mutex<bool>>,
}

pub struct NotificationMultiplexer {
    host: Arc<dyn Host>,
    settings: NotifySettings,
    permission: bool,
    sound_playing: bool,
    blink: Option<BlinkCycle>,
    alert_count: Arc<AtomicUsize>,
}

impl NotificationMultiplexer {
    /// Requests notification permission once; a denial degrades to
    /// sound and title only.
    pub fn new(host: Arc<dyn Host>, settings: NotifySettings) -> Self {
        let permission = settings.system_notifications && host.request_notification_permission();
        if settings.system_notifications && !permission {
            tracing::warn!("⚠️ Notification permission denied, falling back to sound + title");
        }
        Self {
            host,
            settings,
            permission,
            sound_playing: false,
            blink: None,
            alert_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn permission_granted(&self) -> bool {
        self.permission
    }

    pub fn is_sound_playing(&self) -> bool {
        self.sound_playing
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.as_ref().is_some_and(|b| !b.handle.is_finished())
    }

    /// Fan an alert event out to every channel.
    pub fn trigger(&mut self, count: usize) {
        self.alert_count.store(count, Ordering::Relaxed);
        self.ensure_sound();
        if self.permission {
            self.notify_count(count);
        }
        self.ensure_blink(count);
    }

    /// Silence every channel. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(cycle) = self.blink.take() {
            {
                let mut live = cycle.live.lock().unwrap_or_else(|e| e.into_inner());
                *live = false;
            }
            cycle.handle.abort();
        }
        if self.sound_playing {
            self.host.stop_sound();
            self.sound_playing = false;
            tracing::debug!("🔇 Alert sound stopped");
        }
        self.alert_count.store(0, Ordering::Relaxed);
        self.host.set_display_title(&self.settings.neutral_title);
    }

    fn ensure_sound(&mut self) {
        if self.sound_playing {
            return;
        }
        match self.host.play_looping_sound(self.settings.volume) {
            Ok(()) => {
                self.sound_playing = true;
                tracing::debug!("🔊 Alert sound looping (volume {:.2})", self.settings.volume);
            }
            // Retried on the next trigger.
            Err(e) => tracing::warn!("⚠️ Alert sound blocked: {e}"),
        }
    }

    fn notify_count(&self, count: usize) {
        let plural = if count == 1 { "" } else { "s" };
        let notification = HostNotification {
            title: "SlotRadar: manual check due".into(),
            body: format!("{count} application{plural} waiting for a portal check"),
            focus_on_click: true,
        };
        if let Err(e) = self.host.show_notification(&notification) {
            tracing::warn!("⚠️ System notification failed: {e}");
        }
    }

    fn ensure_blink(&mut self, count: usize) {
        if self.is_blinking() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            // No runtime to drive a cycle: show the alert label steadily.
            self.host.set_display_title(&alert_title(count));
            return;
        };
        let live = Arc::new(Mutex::new(true));
        let handle = runtime.spawn(blink_loop(
            self.host.clone(),
            live.clone(),
            self.alert_count.clone(),
            self.settings.neutral_title.clone(),
            self.settings.blink_interval,
        ));
        self.blink = Some(BlinkCycle { handle, live });
    }

}

impl Drop for NotificationMultiplexer {
    fn drop(&mut self) {
        if let Some(cycle) = self.blink.take() {
            cycle.handle.abort();
        }
    }
}

async fn blink_loop(
    host: Arc<dyn Host>,
    live: Arc<Mutex<bool>>,
    count: Arc<AtomicUsize>,
    neutral_title: String,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    let mut lit = false;
    loop {
        ticker.tick().await;
        lit = !lit;
        let guard = live.lock().unwrap_or_else(|e| e.into_inner());
        if !*guard {
            break;
        }
        if lit {
            host.set_display_title(&alert_title(count.load(Ordering::Relaxed)));
        } else {
            host.set_display_title(&neutral_title);
        }
    }
}
