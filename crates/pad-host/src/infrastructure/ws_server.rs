//! WebSocket command listener: accept loop and per-session handling.
//!
//! Each remote gets its own session task.  A session reads text frames,
//! hands them to the [`CommandDispatcher`], and answers protocol pings.
//! Receiving anything, heartbeats included, refreshes the idle deadline; a
//! session that stays silent past the idle timeout is presumed dead and
//! closed, since a healthy remote heartbeats every 30 seconds.
//!
//! The accept loop uses a short timeout so it can poll the shared shutdown
//! flag even when nothing is connecting.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::application::dispatch::{CommandDispatcher, InputInjector};

/// How often the accept loop wakes to check the shutdown flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// Host listener configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: SocketAddr,
    /// Close a session after this long without any inbound frame.
    pub idle_timeout: Duration,
}

/// Runs the accept loop until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(
    config: HostConfig,
    running: Arc<AtomicBool>,
    injector: Arc<dyn InputInjector>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind command listener on {}", config.bind_addr))?;

    info!("command listener on {}", config.bind_addr);
    run_server_on(listener, config, running, injector).await;
    Ok(())
}

/// Accept loop over an already-bound listener.  Split out so tests can bind
/// an ephemeral port themselves.
pub async fn run_server_on(
    listener: TcpListener,
    config: HostConfig,
    running: Arc<AtomicBool>,
    injector: Arc<dyn InputInjector>,
) {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set, stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                info!("remote connected from {peer_addr}");
                let idle_timeout = config.idle_timeout;
                let injector = Arc::clone(&injector);
                tokio::spawn(async move {
                    handle_session(stream, peer_addr, idle_timeout, injector).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept failure; keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Poll timeout, no connection attempt. Check the flag again.
            }
        }
    }
}

/// Outer wrapper for one session task: runs the session and logs how it
/// ended.
async fn handle_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    idle_timeout: Duration,
    injector: Arc<dyn InputInjector>,
) {
    match run_session(stream, peer_addr, idle_timeout, injector).await {
        Ok(()) => info!("session {peer_addr} closed"),
        Err(e) => warn!("session {peer_addr} ended with error: {e:#}"),
    }
}

async fn run_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    idle_timeout: Duration,
    injector: Arc<dyn InputInjector>,
) -> anyhow::Result<()> {
    let mut ws = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake with {peer_addr} failed"))?;

    let dispatcher = CommandDispatcher::new(injector);

    loop {
        let frame = match timeout(idle_timeout, ws.next()).await {
            Ok(Some(Ok(message))) => message,
            Ok(Some(Err(e))) => {
                debug!("session {peer_addr}: socket error: {e}");
                break;
            }
            Ok(None) => break,
            Err(_) => {
                warn!("session {peer_addr}: idle for {idle_timeout:?}, closing");
                let _ = ws.send(Message::Close(None)).await;
                break;
            }
        };

        match frame {
            Message::Text(text) => {
                if let Err(e) = dispatcher.dispatch_frame(&text) {
                    // Injection failures are per-command; the session
                    // itself stays healthy.
                    warn!("session {peer_addr}: injection failed: {e}");
                }
            }
            Message::Ping(payload) => {
                ws.send(Message::Pong(payload)).await?;
            }
            Message::Close(_) => break,
            other => {
                debug!("session {peer_addr}: ignoring {other:?}");
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
