//! Touchpad-Over-IP host — entry point.
//!
//! Listens for the remote's command channel and dispatches incoming
//! commands to the input injector.  This build wires in the logging
//! injector; a platform automation backend replaces it by implementing
//! [`InputInjector`](pad_host::application::dispatch::InputInjector).
//!
//! # Usage
//!
//! ```text
//! pad-host [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>              Bind address [default: 0.0.0.0]
//!   --port <PORT>              Listener port [default: 8080]
//!   --idle-timeout-secs <SECS> Close silent sessions after this [default: 90]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Default   | Description                     |
//! |-------------------------|-----------|---------------------------------|
//! | `PAD_BIND`              | `0.0.0.0` | Bind address                    |
//! | `PAD_PORT`              | `8080`    | Listener port                   |
//! | `PAD_IDLE_TIMEOUT_SECS` | `90`      | Idle session timeout in seconds |

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pad_host::application::dispatch::InputInjector;
use pad_host::infrastructure::injector::LoggingInjector;
use pad_host::infrastructure::ws_server::{run_server, HostConfig};

/// Touchpad-Over-IP host.
///
/// Accepts the remote's command channel and performs the commands locally.
#[derive(Debug, Parser)]
#[command(
    name = "pad-host",
    about = "Command listener and input dispatcher for Touchpad-Over-IP",
    version
)]
struct Cli {
    /// IP address to bind the listener to.  `0.0.0.0` accepts remotes from
    /// any interface; `127.0.0.1` accepts only local connections.
    #[arg(long, default_value = "0.0.0.0", env = "PAD_BIND")]
    bind: String,

    /// TCP port for the command listener.
    #[arg(long, default_value_t = 8080, env = "PAD_PORT")]
    port: u16,

    /// Close a session after this many seconds without any frame.  A
    /// healthy remote heartbeats every 30 seconds, so three missed
    /// heartbeats is the default cutoff.
    #[arg(long, default_value_t = 90, env = "PAD_IDLE_TIMEOUT_SECS")]
    idle_timeout_secs: u64,
}

impl Cli {
    fn into_host_config(self) -> anyhow::Result<HostConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(HostConfig {
            bind_addr,
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_host_config()?;

    info!("pad-host starting on {}", config.bind_addr);

    let running = Arc::new(AtomicBool::new(true));
    let running_for_signal = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_for_signal.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    let injector: Arc<dyn InputInjector> = Arc::new(LoggingInjector::new());
    run_server(config, running, injector).await?;

    info!("pad-host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
