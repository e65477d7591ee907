//! tocsin - a single-process, in-memory reminder scheduler.
//!
//! Usage:
//!   tocsin run --in 2 --in 5 --message "stretch"
//!
//! Seeds one reminder per `--in` offset and waits for all of them to fire,
//! or for Ctrl+C.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::{Parser, Subcommand};
use tocsin::{Hooks, Reminder, Scheduler, unix_now};
use tracing::{info, warn};

/// tocsin - fire reminders at their due times
#[derive(Parser)]
#[command(name = "tocsin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler with one reminder per offset
    Run {
        /// Seconds from now until a reminder fires (repeatable)
        #[arg(long = "in", value_name = "SECONDS")]
        offsets: Vec<u64>,

        /// Message carried by every reminder
        #[arg(short, long, default_value = "reminder")]
        message: String,
    },
}

/// Hooks that log fired reminders and signal once the last one fired.
struct CompletionWatcher {
    remaining: AtomicUsize,
    done: Arc<tokio::sync::Notify>,
}

#[async_trait::async_trait]
impl Hooks<String> for CompletionWatcher {
    async fn on_stage(&self, reminder: &Reminder<String>) {
        info!(
            "Staged reminder {} due at {}",
            reminder.id, reminder.due
        );
    }

    async fn on_remind(&self, reminder: &Reminder<String>) {
        info!("{} (reminder {})", reminder.payload, reminder.id);
        if self.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.done.notify_one();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { offsets, message } => {
            run_reminders(offsets, message).await?;
        }
    }

    Ok(())
}

/// Seed one reminder per offset and wait for completion or Ctrl+C.
async fn run_reminders(
    offsets: Vec<u64>,
    message: String,
) -> Result<(), Box<dyn std::error::Error>> {
    if offsets.is_empty() {
        warn!("No --in offsets given, nothing to schedule");
        return Ok(());
    }

    let done = Arc::new(tokio::sync::Notify::new());
    let watcher = CompletionWatcher {
        remaining: AtomicUsize::new(offsets.len()),
        done: done.clone(),
    };

    let now = unix_now();
    let seeds: Vec<(String, u64)> = offsets
        .iter()
        .map(|offset| (message.clone(), now + offset))
        .collect();

    info!("Scheduling {} reminder(s)", seeds.len());
    info!("Press Ctrl+C to stop");

    let scheduler = Scheduler::with_hooks(watcher);
    let (handle, loop_task) = scheduler.start(seeds).await;

    tokio::select! {
        _ = done.notified() => {
            info!("All reminders fired");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    handle.shutdown().await?;
    let _ = loop_task.await;

    info!("Goodbye!");
    Ok(())
}
