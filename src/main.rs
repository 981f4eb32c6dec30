//! # SlotRadar — manual appointment-check radar
//!
//! Usage:
//!   slotradar run                     # Radar + alarm clock with an operator console
//!   slotradar rank                    # Cockpit ordering, most pressing first
//!   slotradar due                     # Records due for a manual check right now
//!   slotradar check <client> <record> # Record a manual portal check
//!   slotradar booked <client> <record># Appointment obtained, stop monitoring
//!   slotradar alarm add 09:00         # One-shot reminder

mod console;
mod host;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use slotradar_core::{AppConfig, RecordSource};
use slotradar_scheduler::{
    AlarmBook, AlarmClock, Cockpit, JsonStore, NotificationMultiplexer, RadarEngine,
    RadarScheduler,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::console::{Console, parse_line};
use crate::host::TerminalHost;

#[derive(Parser)]
#[command(
    name = "slotradar",
    version,
    about = "📡 SlotRadar — tells you which visa applications need a manual slot check"
)]
struct Cli {
    /// Config file (default: ~/.slotradar/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the radar and alarm clock until Ctrl-C
    Run {
        /// Start with the radar muted
        #[arg(long)]
        muted: bool,
    },
    /// Print the cockpit ordering once
    Rank,
    /// Print records due for a manual check
    Due,
    /// Record a manual portal check
    Check { client_id: String, record_id: String },
    /// Appointment obtained, promote the record out of monitoring
    Booked { client_id: String, record_id: String },
    /// Manage one-shot reminders
    Alarm {
        #[command(subcommand)]
        action: AlarmAction,
    },
}

#[derive(Subcommand)]
enum AlarmAction {
    Add { time: String },
    Remove { time: String },
    List,
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from(&PathBuf::from(shellexpand::tilde(p).to_string()))?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

struct Runtime {
    host: Arc<TerminalHost>,
    store: Arc<JsonStore>,
}

impl Runtime {
    fn engine(&self, config: &AppConfig) -> RadarEngine {
        let notifier = NotificationMultiplexer::new(self.host.clone(), (&config.notify).into());
        RadarEngine::new(self.store.clone(), self.store.clone(), notifier)
    }

    fn alarm_book(&self, config: &AppConfig, permission: bool) -> AlarmBook {
        let mut book = AlarmBook::new(
            self.host.clone(),
            self.store.clone(),
            Duration::from_secs(config.alarm.banner_secs),
            permission,
        );
        let stored = self.store.load_alarms();
        if stored.is_empty() {
            book.seed(&config.alarm.alarms);
        } else {
            book.seed(&stored);
        }
        book
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "slotradar=debug,slotradar_scheduler=debug"
    } else {
        "slotradar=info,slotradar_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let rt = Runtime {
        host: Arc::new(TerminalHost::new(config.notify.system_notifications)),
        store: Arc::new(JsonStore::open(&config.store)?),
    };
    let now = Local::now().naive_local();

    match cli.command {
        Command::Run { muted } => run(config, rt, muted).await?,
        Command::Rank => {
            let cockpit = Cockpit::build(&rt.store.records(), &rt.store.opening_logs(), now);
            if cockpit.is_empty() {
                println!("No records awaiting an appointment.");
            }
            for entry in cockpit.entries() {
                println!("{}", console::describe(entry));
            }
        }
        Command::Due => {
            let due = rt.engine(&config).scan(now);
            if due.is_empty() {
                println!("✅ Nothing due.");
            }
            for alert in due {
                println!("🔔 {:<12} {:<20} {}", alert.id, alert.name, alert.destination);
            }
        }
        Command::Check { client_id, record_id } => {
            let checked = rt.engine(&config).mark_checked(&client_id, &record_id, now)?;
            println!("✅ {client_id}/{record_id} checked at {}", checked.timestamp);
        }
        Command::Booked { client_id, record_id } => {
            rt.engine(&config).confirm_booked(&client_id, &record_id)?;
            println!("🎉 {client_id}/{record_id} promoted to appointment booked");
        }
        Command::Alarm { action } => {
            // One-shot edits never fire, so no notification permission is needed.
            let mut book = rt.alarm_book(&config, false);
            match action {
                AlarmAction::Add { time } => {
                    let t = book.add(&time)?;
                    println!("⏰ Alarm set for {t}");
                }
                AlarmAction::Remove { time } => {
                    if book.remove(&time)? {
                        println!("🗑️ Alarm {time} removed");
                    } else {
                        println!("No alarm at {time}");
                    }
                }
                AlarmAction::List => {
                    for t in book.list() {
                        println!("⏰ {t}");
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run(config: AppConfig, rt: Runtime, muted: bool) -> Result<()> {
    let engine = rt.engine(&config);
    let permission = engine.notifier().permission_granted();
    let mut radar = RadarScheduler::new(engine, Duration::from_secs(config.radar.tick_secs));
    let mut clock = AlarmClock::new(
        rt.alarm_book(&config, permission),
        Duration::from_secs(config.alarm.tick_secs),
    );
    clock.start();
    // The loop always runs so `resume` takes effect on the next tick.
    radar.start(config.radar.start_active && !muted).await;

    println!("📡 SlotRadar v{}", env!("CARGO_PKG_VERSION"));
    println!("   📂 Data Dir:   {}", config.store.data_path().display());
    println!("   ⏱️  Radar tick: {}s", config.radar.tick_secs);
    println!("   ⏰ Alarms:     {}", clock.book().lock().await.list().join(" "));
    println!("   Type 'help' for commands.\n");

    let mut console = Console {
        engine: radar.engine(),
        alarms: clock.book(),
        config,
        cockpit: Cockpit::default(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match parse_line(&line) {
                    Some(cmd) => {
                        if !console.execute(cmd).await {
                            break;
                        }
                    }
                    None => println!("unknown command, type 'help'"),
                },
                None => {
                    // stdin closed: keep running headless until Ctrl-C.
                    tokio::signal::ctrl_c().await?;
                    break;
                }
            },
        }
    }

    tracing::info!("👋 Shutting down");
    radar.deactivate().await;
    clock.stop().await;
    Ok(())
}
