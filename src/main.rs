//! # Spawnwatch — spawn-timer tracker
//!
//! Reads spawn reports ("took NUC 6:00 PM") from stdin, keeps the live
//! respawn schedule, and prints warning/extension/expiry notices as the
//! scheduler advances it.
//!
//! Usage:
//!   spawnwatch                      # canonical offset, 60s ticks
//!   spawnwatch --offset +05:30      # submitter offset for stdin reports
//!   spawnwatch --tick-interval 10   # faster scheduler ticks
//!
//! Stdin lines are reports in a single scope; the line "list" prints the
//! current schedule.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Utc};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch, Mutex};
use tracing_subscriber::EnvFilter;

use spawnwatch_core::{catalog, SpawnwatchConfig};
use spawnwatch_core::types::{CategoryKind, DuplicateKind, ReportOutcome, SpawnEvent, SpawnKey};
use spawnwatch_scheduler::{spawn_scheduler, TickEngine};
use spawnwatch_tracker::{FixedTimezone, SpawnRegistry, TrackerService};

#[derive(Parser)]
#[command(name = "spawnwatch", version, about = "⏱️ Spawnwatch — spawn-timer tracker")]
struct Cli {
    /// Config file path (default: ~/.spawnwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scope (channel) the stdin reports belong to
    #[arg(long, default_value = "cli")]
    scope: String,

    /// UTC offset for stdin reports, e.g. +08:00 (default: canonical offset)
    #[arg(long)]
    offset: Option<String>,

    /// Scheduler tick interval in seconds (overrides config)
    #[arg(long)]
    tick_interval: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let config = match &cli.config {
        Some(path) => SpawnwatchConfig::load_from(path)?,
        None => SpawnwatchConfig::load()?,
    };
    let canonical = config.canonical_tz()?;
    let submitter_tz: FixedOffset = match &cli.offset {
        Some(text) => text
            .parse()
            .with_context(|| format!("invalid --offset '{text}'"))?,
        None => canonical,
    };
    let tick_interval = cli.tick_interval.unwrap_or(config.tick_interval_secs);

    let registry = Arc::new(Mutex::new(SpawnRegistry::new()));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let service = TrackerService::new(
        Arc::clone(&registry),
        Arc::new(FixedTimezone(submitter_tz)),
        events_tx.clone(),
    );

    // Rendering collaborator: prints notices as they come in.
    let render = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            render_event(&event, canonical);
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    // The scheduler shares the event stream with the message path.
    let engine = TickEngine::new(Arc::clone(&registry), events_tx);
    let scheduler = tokio::spawn(spawn_scheduler(engine, tick_interval, shutdown_rx));

    tracing::info!("📡 Tracking spawns in scope '{}' (offset {submitter_tz})", cli.scope);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim() == "list" => {
                        print_schedule(&service, &cli.scope, canonical).await;
                    }
                    Some(line) => {
                        let outcome = service
                            .handle_report_text(&cli.scope, "cli", &line, Utc::now())
                            .await;
                        if let ReportOutcome::Accepted { .. } = outcome {
                            print_schedule(&service, &cli.scope, canonical).await;
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    // Let the in-flight tick finish before halting.
    let _ = shutdown_tx.send(true);
    scheduler.await?;
    drop(service);
    render.await?;
    Ok(())
}

fn describe_key(key: &SpawnKey) -> String {
    let name = catalog::category(&key.category)
        .map(|def| def.display_name)
        .unwrap_or(key.category.as_str());
    match key.location.as_deref().and_then(catalog::location_display) {
        Some(location) => format!("{name} ({location})"),
        None => name.to_string(),
    }
}

fn render_event(event: &SpawnEvent, tz: FixedOffset) {
    let clock = |at: &chrono::DateTime<Utc>| at.with_timezone(&tz).format("%I:%M %p").to_string();
    match event {
        SpawnEvent::Accepted { key, entry } => {
            println!("✅ {} next spawn at {}", describe_key(key), clock(&entry.next_spawn_at));
        }
        SpawnEvent::RejectedDuplicate { key, kind, existing } => match kind {
            DuplicateKind::Global => println!(
                "⚠️ The next spawn for {} at {} is already posted!",
                describe_key(key),
                clock(existing)
            ),
            DuplicateKind::Submitter => println!(
                "⚠️ You already sent the same time for {}.",
                describe_key(key)
            ),
        },
        SpawnEvent::Warning { key } => {
            println!("⚠️ {} will spawn in 5 minutes!", describe_key(key));
        }
        SpawnEvent::AutoExtended { key, entry } => {
            println!(
                "🔁 {} timer restarted, now {}",
                describe_key(key),
                clock(&entry.next_spawn_at)
            );
        }
        SpawnEvent::Expired { key, taken_at } => {
            println!(
                "❌ {} expired (spawned at {})",
                describe_key(key),
                clock(taken_at)
            );
        }
    }
}

async fn print_schedule(service: &TrackerService, scope: &str, tz: FixedOffset) {
    let active = service.list_active(scope).await;
    if active.is_empty() {
        println!("No upcoming spawns tracked.");
        return;
    }
    let mut current_kind = None;
    for (key, entry) in active {
        if current_kind != Some(entry.kind) {
            current_kind = Some(entry.kind);
            let heading = match entry.kind {
                CategoryKind::Room => "🕒 Rooms:",
                CategoryKind::Boss => "🛡️ Bosses:",
                CategoryKind::Card => "🃏 Cards:",
            };
            println!("{heading}");
        }
        println!(
            "- {}: {} ({})",
            describe_key(&key),
            entry.next_spawn_at.with_timezone(&tz).format("%I:%M %p"),
            entry.next_spawn_at.with_timezone(&tz).format("%b %e")
        );
    }
}
