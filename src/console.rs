//! Operator console for `slotradar run`: one command per stdin line.

use std::sync::Arc;

use chrono::Local;
use slotradar_core::AppConfig;
use slotradar_scheduler::{AlarmBook, Cockpit, CockpitEntry, RadarEngine};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Alerts,
    Ack(String),
    IgnoreAll,
    Check { client_id: String, record_id: String },
    Booked { client_id: String, record_id: String },
    Mute,
    Resume,
    Rank,
    Next,
    Prev,
    Open,
    AlarmAdd(String),
    AlarmRemove(String),
    AlarmList,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  alerts                       list pending alerts
  ack <client-id>              acknowledge one alert
  ignore                       drop every pending alert
  check <client-id> <record>   record a manual portal check
  booked <client-id> <record>  appointment obtained, stop monitoring
  mute | resume                toggle the radar
  rank | next | prev | open    cockpit focus and booking page
  alarm add|rm <HH:MM>         manage reminders
  alarms                       list reminders
  quit";

pub fn parse_line(line: &str) -> Option<ConsoleCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let cmd = match parts.as_slice() {
        ["alerts"] => ConsoleCommand::Alerts,
        ["ack", id] => ConsoleCommand::Ack(id.to_string()),
        ["ignore"] => ConsoleCommand::IgnoreAll,
        ["check", client, record] => ConsoleCommand::Check {
            client_id: client.to_string(),
            record_id: record.to_string(),
        },
        ["booked", client, record] => ConsoleCommand::Booked {
            client_id: client.to_string(),
            record_id: record.to_string(),
        },
        ["mute"] => ConsoleCommand::Mute,
        ["resume"] => ConsoleCommand::Resume,
        ["rank"] => ConsoleCommand::Rank,
        ["next" | "n"] => ConsoleCommand::Next,
        ["prev" | "p"] => ConsoleCommand::Prev,
        ["open"] => ConsoleCommand::Open,
        ["alarm", "add", time] => ConsoleCommand::AlarmAdd(time.to_string()),
        ["alarm", "rm" | "remove", time] => ConsoleCommand::AlarmRemove(time.to_string()),
        ["alarms"] => ConsoleCommand::AlarmList,
        ["help" | "?"] => ConsoleCommand::Help,
        ["quit" | "exit" | "q"] => ConsoleCommand::Quit,
        _ => return None,
    };
    Some(cmd)
}

pub fn describe(entry: &CockpitEntry) -> String {
    let r = &entry.record;
    let mut line = format!(
        "{:>7.1}  {:<20} {:<12} {:<10} every {}m{}",
        entry.sort_key,
        r.client_name,
        r.destination,
        entry.scan.elapsed.text,
        entry.scan.interval_minutes,
        if entry.scan.due { "  DUE" } else { "" }
    );
    if entry.scan.urgency.history_match {
        line.push_str("  ★ slots seen at this hour");
    }
    line
}

/// Shared state the console drives.
pub struct Console {
    pub engine: Arc<Mutex<RadarEngine>>,
    pub alarms: Arc<Mutex<AlarmBook>>,
    pub config: AppConfig,
    pub cockpit: Cockpit,
}

impl Console {
    /// Execute one command. Returns `false` when the operator quits.
    pub async fn execute(&mut self, cmd: ConsoleCommand) -> bool {
        let now = Local::now().naive_local();
        match cmd {
            ConsoleCommand::Alerts => {
                let alerts = self.engine.lock().await.visible_alerts();
                if alerts.is_empty() {
                    println!("no pending alerts");
                }
                for a in alerts {
                    println!("  🔔 {:<12} {:<20} {}", a.id, a.name, a.destination);
                }
            }
            ConsoleCommand::Ack(id) => {
                if !self.engine.lock().await.acknowledge(&id) {
                    println!("no alert for '{id}'");
                }
            }
            ConsoleCommand::IgnoreAll => self.engine.lock().await.clear_all(),
            ConsoleCommand::Check { client_id, record_id } => {
                if let Err(e) = self.engine.lock().await.mark_checked(&client_id, &record_id, now) {
                    println!("❌ {e}");
                }
            }
            ConsoleCommand::Booked { client_id, record_id } => {
                if let Err(e) = self.engine.lock().await.confirm_booked(&client_id, &record_id) {
                    println!("❌ {e}");
                }
            }
            ConsoleCommand::Mute => self.engine.lock().await.set_active(false),
            ConsoleCommand::Resume => self.engine.lock().await.set_active(true),
            ConsoleCommand::Rank => {
                let source = self.engine.lock().await.source();
                self.cockpit = Cockpit::build(&source.records(), &source.opening_logs(), now);
                for entry in self.cockpit.entries() {
                    println!("{}", describe(entry));
                }
            }
            ConsoleCommand::Next => match self.cockpit.next() {
                Some(entry) => println!("▶ {}", describe(entry)),
                None => println!("cockpit empty, run 'rank' first"),
            },
            ConsoleCommand::Prev => match self.cockpit.previous() {
                Some(entry) => println!("▶ {}", describe(entry)),
                None => println!("cockpit empty, run 'rank' first"),
            },
            ConsoleCommand::Open => match self.cockpit.current() {
                Some(entry) => match self.config.center_url(&entry.record.destination) {
                    Some(url) => println!("🌐 {url}"),
                    None => println!("no booking URL configured for {}", entry.record.destination),
                },
                None => println!("cockpit empty, run 'rank' first"),
            },
            ConsoleCommand::AlarmAdd(time) => {
                if let Err(e) = self.alarms.lock().await.add(&time) {
                    println!("❌ {e}");
                }
            }
            ConsoleCommand::AlarmRemove(time) => match self.alarms.lock().await.remove(&time) {
                Ok(true) => {}
                Ok(false) => println!("no alarm at {time}"),
                Err(e) => println!("❌ {e}"),
            },
            ConsoleCommand::AlarmList => {
                let list = self.alarms.lock().await.list();
                println!("⏰ {}", if list.is_empty() { "(none)".to_string() } else { list.join(" ") });
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return false,
        }
        true
    }
}
