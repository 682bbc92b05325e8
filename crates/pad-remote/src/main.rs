//! Touchpad-Over-IP remote — entry point.
//!
//! Runs the gesture engine against a contact event trace and streams the
//! resulting commands to the host over the WebSocket command channel.  The
//! trace comes from a file or from stdin as JSON lines (one contact event
//! per line), which is also how a touch surface front end feeds this
//! process.
//!
//! # Usage
//!
//! ```text
//! pad-remote [OPTIONS]
//!
//! Options:
//!   --host-url <URL>         Host WebSocket URL [default: ws://127.0.0.1:8080]
//!   --trace <PATH>           Contact event trace file (stdin when omitted)
//!   --tick-interval-ms <MS>  Gesture timer poll cadence [default: 50]
//!   --settings <PATH>        Settings file override
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Default               | Description            |
//! |------------------------|-----------------------|------------------------|
//! | `PAD_HOST_URL`         | `ws://127.0.0.1:8080` | Host WebSocket URL     |
//! | `PAD_TICK_INTERVAL_MS` | `50`                  | Timer poll cadence     |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pad_remote::application::session::RemoteSession;
use pad_remote::domain::events::parse_trace_line;
use pad_remote::infrastructure::channel::{spawn_channel, ChannelConfig, ChannelHandle};
use pad_remote::infrastructure::storage;

/// Touchpad-Over-IP remote.
///
/// Streams gesture commands from a contact event trace to the host.
#[derive(Debug, Parser)]
#[command(
    name = "pad-remote",
    about = "Gesture recognition and command channel client for Touchpad-Over-IP",
    version
)]
struct Cli {
    /// WebSocket URL of the host's command listener.
    #[arg(long, default_value = "ws://127.0.0.1:8080", env = "PAD_HOST_URL")]
    host_url: String,

    /// Contact event trace file.  Reads stdin when omitted, so a touch
    /// surface front end can pipe events in live.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// How often to poll the gesture engine's timers, in milliseconds.
    ///
    /// Bounds how late a deferred right click can fire relative to its
    /// deadline.
    #[arg(long, default_value_t = 50, env = "PAD_TICK_INTERVAL_MS")]
    tick_interval_ms: u64,

    /// Load settings from this file instead of the platform config path.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => storage::load_settings_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => storage::load_settings().context("failed to load settings")?,
    };

    info!(host = %cli.host_url, "pad-remote starting");

    let (channel, channel_task) = spawn_channel(ChannelConfig::new(cli.host_url.clone()));
    let session = RemoteSession::new(channel.clone(), settings);

    let reader: Box<dyn AsyncBufRead + Unpin> = match &cli.trace {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("failed to open trace file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    tokio::select! {
        result = replay(reader, session, Duration::from_millis(cli.tick_interval_ms)) => {
            result?;
            info!("trace complete");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    // Dropping the last handle lets the channel task close the socket and
    // exit on its own.
    drop(channel);
    channel_task.await.ok();

    info!("pad-remote stopped");
    Ok(())
}

/// Plays a trace in real time: each event is delivered at its recorded
/// offset from the start, with timer polls at `tick_interval` in between.
async fn replay(
    reader: Box<dyn AsyncBufRead + Unpin>,
    mut session: RemoteSession<ChannelHandle>,
    tick_interval: Duration,
) -> anyhow::Result<()> {
    let started = tokio::time::Instant::now();
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(text) = lines.next_line().await.context("failed to read trace")? {
        line_no += 1;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = parse_trace_line(trimmed, line_no)?;

        // Tick at the configured cadence until the event is due.
        let due = started + Duration::from_millis(event.t_ms());
        while tokio::time::Instant::now() < due {
            tokio::select! {
                _ = ticker.tick() => {
                    session.tick(started.elapsed().as_millis() as u64);
                }
                () = tokio::time::sleep_until(due) => break,
            }
        }

        session.handle_event(&event);
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_point_at_localhost() {
        let cli = Cli::parse_from(["pad-remote"]);
        assert_eq!(cli.host_url, "ws://127.0.0.1:8080");
        assert_eq!(cli.trace, None);
    }

    #[test]
    fn test_cli_default_tick_interval_is_fifty_ms() {
        let cli = Cli::parse_from(["pad-remote"]);
        assert_eq!(cli.tick_interval_ms, 50);
    }

    #[test]
    fn test_cli_host_url_override() {
        let cli = Cli::parse_from(["pad-remote", "--host-url", "ws://10.0.0.5:9000"]);
        assert_eq!(cli.host_url, "ws://10.0.0.5:9000");
    }

    #[test]
    fn test_cli_trace_and_settings_overrides() {
        let cli = Cli::parse_from([
            "pad-remote",
            "--trace",
            "/tmp/session.jsonl",
            "--settings",
            "/tmp/settings.toml",
        ]);
        assert_eq!(cli.trace, Some(PathBuf::from("/tmp/session.jsonl")));
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/settings.toml")));
    }
}
