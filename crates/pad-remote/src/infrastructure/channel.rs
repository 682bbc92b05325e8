//! The command channel: a self-healing WebSocket client to the host.
//!
//! One background task owns the socket for the whole life of the process.
//! It dials, pumps commands out, answers pings, sends application-level
//! heartbeats, and when the connection drops it sleeps out the retry delay
//! computed by [`LinkSupervisor`] and dials again.  Callers interact only
//! with the cloneable [`ChannelHandle`]:
//!
//! - [`ChannelHandle::send`] forwards a command when the channel is open
//!   and drops it otherwise.  Commands are never queued across a gap;
//!   replaying stale pointer motion after a reconnect is worse than losing
//!   it.  A send that finds the channel down doubles as a reconnect
//!   trigger, so a user still touching the surface keeps the dial loop
//!   awake.
//! - [`ChannelHandle::force_reconnect`] cuts any backoff sleep short and
//!   wakes a suspended channel.  The remote calls this when the surface
//!   regains focus.
//!
//! After [`MAX_RETRY_ATTEMPTS`](crate::domain::link::MAX_RETRY_ATTEMPTS)
//! consecutive failures the task stops dialing on its own and waits for
//! one of those triggers.  The task exits when every handle has been
//! dropped.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

use pad_core::{encode_command, Command};

use crate::application::session::CommandSink;
use crate::domain::link::{LinkState, LinkSupervisor, HEARTBEAT_INTERVAL};

/// Outgoing queue depth.  Commands only sit here for the instant between
/// `send` and the socket write, so the queue stays near empty.
const OUTGOING_QUEUE_DEPTH: usize = 64;

/// Configuration for the command channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL of the host, e.g. `ws://192.168.1.20:8080`.
    pub host_url: String,
    /// Interval between application-level heartbeats while open.
    pub heartbeat_interval: std::time::Duration,
}

impl ChannelConfig {
    pub fn new(host_url: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }
}

/// Cloneable front end to the channel task.
#[derive(Clone)]
pub struct ChannelHandle {
    outgoing: mpsc::Sender<Command>,
    state: watch::Receiver<LinkState>,
    reconnect: Arc<Notify>,
}

impl ChannelHandle {
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == LinkState::Open
    }

    /// A watch receiver for observing lifecycle transitions.
    pub fn state_watch(&self) -> watch::Receiver<LinkState> {
        self.state.clone()
    }

    /// Sends a command if the channel is open, drops it otherwise.
    ///
    /// A drop while the channel is retrying or suspended also wakes the
    /// dial loop: the user is clearly still producing input, so waiting
    /// out the rest of the backoff helps nobody.
    pub fn send(&self, command: Command) {
        match self.state() {
            LinkState::Open => {
                if let Err(e) = self.outgoing.try_send(command) {
                    // Queue full or task gone; either way the command is
                    // not worth waiting for.
                    trace!("command dropped: {e}");
                }
            }
            LinkState::Connecting => {
                trace!(kind = command.kind(), "command dropped, channel not open");
            }
            LinkState::Idle | LinkState::Retrying { .. } | LinkState::Suspended => {
                trace!(kind = command.kind(), "command dropped, channel not open");
                self.reconnect.notify_one();
            }
        }
    }

    /// Requests an immediate reconnect, cutting any backoff sleep short.
    pub fn force_reconnect(&self) {
        self.reconnect.notify_one();
    }
}

impl CommandSink for ChannelHandle {
    fn send(&self, command: Command) {
        ChannelHandle::send(self, command);
    }
}

/// Spawns the channel task and returns its handle.
pub fn spawn_channel(config: ChannelConfig) -> (ChannelHandle, JoinHandle<()>) {
    let (outgoing_tx, outgoing_rx) = mpsc::channel(OUTGOING_QUEUE_DEPTH);
    let (state_tx, state_rx) = watch::channel(LinkState::Idle);
    let reconnect = Arc::new(Notify::new());

    let handle = ChannelHandle {
        outgoing: outgoing_tx,
        state: state_rx,
        reconnect: Arc::clone(&reconnect),
    };

    let task = tokio::spawn(run_channel(config, outgoing_rx, state_tx, reconnect));
    (handle, task)
}

/// Why the connected pump stopped.
enum PumpExit {
    /// The socket failed or closed; retry after backoff.
    Lost,
    /// A forced reconnect arrived while connected; redial immediately.
    Redial,
    /// All handles are gone; the task is done.
    Shutdown,
}

async fn run_channel(
    config: ChannelConfig,
    mut outgoing_rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<LinkState>,
    reconnect: Arc<Notify>,
) {
    let mut supervisor = LinkSupervisor::new();

    loop {
        supervisor.on_connecting();
        let _ = state_tx.send(supervisor.state());
        debug!(url = %config.host_url, "dialing host");

        match connect_async(&config.host_url).await {
            Ok((socket, _response)) => {
                supervisor.on_open();
                let _ = state_tx.send(supervisor.state());
                info!(url = %config.host_url, "command channel open");

                let exit = pump(socket, &config, &mut outgoing_rx, &reconnect).await;

                // Whatever raced into the queue around the disconnect is
                // stale now.
                while outgoing_rx.try_recv().is_ok() {}

                match exit {
                    PumpExit::Shutdown => {
                        let _ = state_tx.send(LinkState::Idle);
                        return;
                    }
                    PumpExit::Redial => {
                        supervisor.on_forced_reconnect();
                        let _ = state_tx.send(supervisor.state());
                        continue;
                    }
                    PumpExit::Lost => {}
                }
            }
            Err(e) => {
                warn!(url = %config.host_url, "connect failed: {e}");
            }
        }

        match supervisor.on_lost() {
            Some(delay) => {
                let _ = state_tx.send(supervisor.state());
                debug!("retrying in {delay:?}");

                let deadline = tokio::time::Instant::now() + delay;
                loop {
                    tokio::select! {
                        () = tokio::time::sleep_until(deadline) => break,
                        () = reconnect.notified() => {
                            debug!("reconnect trigger, skipping remaining backoff");
                            supervisor.on_forced_reconnect();
                            break;
                        }
                        maybe = outgoing_rx.recv() => match maybe {
                            // Lost the race in `send`: the channel closed under it.
                            Some(cmd) => trace!(kind = cmd.kind(), "command dropped, channel not open"),
                            None => {
                                let _ = state_tx.send(LinkState::Idle);
                                return;
                            }
                        },
                    }
                }
            }
            None => {
                // Retry budget spent.  Park until something external asks
                // for the channel again.
                let _ = state_tx.send(supervisor.state());
                warn!("retry budget exhausted, channel suspended until next trigger");

                loop {
                    tokio::select! {
                        () = reconnect.notified() => {
                            supervisor.on_forced_reconnect();
                            break;
                        }
                        maybe = outgoing_rx.recv() => match maybe {
                            Some(cmd) => trace!(kind = cmd.kind(), "command dropped, channel not open"),
                            None => {
                                let _ = state_tx.send(LinkState::Idle);
                                return;
                            }
                        },
                    }
                }
            }
        }
    }
}

/// Pumps an open socket until it fails, a redial is requested, or every
/// handle is dropped.
async fn pump<S>(
    socket: tokio_tungstenite::WebSocketStream<S>,
    config: &ChannelConfig,
    outgoing_rx: &mut mpsc::Receiver<Command>,
    reconnect: &Notify,
) -> PumpExit
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut heartbeat = tokio::time::interval(config.heartbeat_interval);
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately; consume it so
    // the first heartbeat goes out one full interval after open.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            maybe = outgoing_rx.recv() => match maybe {
                Some(command) => {
                    if let Err(e) = write_command(&mut ws_tx, &command).await {
                        warn!("write failed: {e}");
                        return PumpExit::Lost;
                    }
                }
                None => {
                    // All handles dropped: close politely and stop.
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return PumpExit::Shutdown;
                }
            },

            _ = heartbeat.tick() => {
                if let Err(e) = write_command(&mut ws_tx, &Command::Heartbeat).await {
                    warn!("heartbeat write failed: {e}");
                    return PumpExit::Lost;
                }
                trace!("heartbeat sent");
            }

            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Ping(payload))) => {
                    if ws_tx.send(Message::Pong(payload)).await.is_err() {
                        return PumpExit::Lost;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("host closed the command channel");
                    return PumpExit::Lost;
                }
                Some(Ok(_)) => {
                    // The host does not speak to the remote; ignore.
                }
                Some(Err(e)) => {
                    warn!("socket error: {e}");
                    return PumpExit::Lost;
                }
            },

            () = reconnect.notified() => {
                info!("forced reconnect while open, redialing");
                return PumpExit::Redial;
            }
        }
    }
}

async fn write_command<T>(ws_tx: &mut T, command: &Command) -> anyhow::Result<()>
where
    T: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let frame = encode_command(command)?;
    ws_tx.send(Message::Text(frame)).await?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pad_core::decode_command;
    use tokio::net::TcpListener;

    /// Accepts one WebSocket connection on an ephemeral port and returns the
    /// bound port plus the accepted stream.
    async fn one_shot_server() -> (u16, tokio::task::JoinHandle<Vec<Command>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let mut received = Vec::new();
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Text(frame) = msg {
                    received.push(decode_command(&frame).unwrap());
                    // Two commands are enough for the assertions below.
                    if received.len() == 2 {
                        break;
                    }
                }
            }
            received
        });

        (port, server)
    }

    #[tokio::test]
    async fn test_commands_sent_while_open_reach_the_host() {
        // Arrange: a host that records what it receives
        let (port, server) = one_shot_server().await;
        let (handle, task) = spawn_channel(ChannelConfig::new(format!("ws://127.0.0.1:{port}")));

        // Wait for the channel to come up
        let mut state = handle.state_watch();
        state
            .wait_for(|s| *s == LinkState::Open)
            .await
            .expect("channel task alive");

        // Act
        handle.send(Command::LeftClick);
        handle.send(Command::Scroll { dx: 0, dy: 3 });

        // Assert
        let received = server.await.unwrap();
        assert_eq!(
            received,
            vec![Command::LeftClick, Command::Scroll { dx: 0, dy: 3 }]
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_open_channel_heartbeats_without_any_send() {
        // Arrange: a host that records the first frame and when it arrived
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let opened = tokio::time::Instant::now();
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(frame))) => {
                        return (decode_command(&frame).unwrap(), opened.elapsed());
                    }
                    Some(Ok(_)) => {}
                    _ => panic!("connection dropped before the first frame"),
                }
            }
        });

        let mut config = ChannelConfig::new(format!("ws://127.0.0.1:{port}"));
        config.heartbeat_interval = std::time::Duration::from_millis(200);
        let (handle, task) = spawn_channel(config);

        let mut state = handle.state_watch();
        state.wait_for(|s| *s == LinkState::Open).await.unwrap();

        // Assert: the keep-alive arrives with no send call, one full
        // interval after open rather than immediately
        let (first, elapsed) = server.await.unwrap();
        assert_eq!(first, Command::Heartbeat);
        assert!(
            elapsed >= std::time::Duration::from_millis(150),
            "first heartbeat fired early: {elapsed:?}"
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_before_open_are_dropped_not_queued() {
        let (port, server) = one_shot_server().await;
        // Point the channel at a dead port first so it cannot open
        let (handle, task) = spawn_channel(ChannelConfig::new("ws://127.0.0.1:1"));

        // These must be dropped, not queued for later
        handle.send(Command::RightClick);
        handle.send(Command::MouseDown);
        assert!(!handle.is_open());

        drop(handle);
        task.abort();

        // A fresh channel to a live host receives only what is sent while open
        let (handle, task) = spawn_channel(ChannelConfig::new(format!("ws://127.0.0.1:{port}")));
        let mut state = handle.state_watch();
        state.wait_for(|s| *s == LinkState::Open).await.unwrap();

        handle.send(Command::LeftClick);
        handle.send(Command::MouseUp);

        let received = server.await.unwrap();
        assert_eq!(received, vec![Command::LeftClick, Command::MouseUp]);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_reports_retrying_after_failed_dial() {
        // Nothing listens on port 1
        let (handle, task) = spawn_channel(ChannelConfig::new("ws://127.0.0.1:1"));

        let mut state = handle.state_watch();
        state
            .wait_for(|s| matches!(s, LinkState::Retrying { .. }))
            .await
            .expect("channel task alive");

        assert!(!handle.is_open());
        drop(handle);
        task.abort();
    }

    #[tokio::test]
    async fn test_send_while_down_wakes_the_dial_loop() {
        // Nothing listens on port 1; the first failure schedules a 1 s wait
        let (handle, task) = spawn_channel(ChannelConfig::new("ws://127.0.0.1:1"));

        let mut state = handle.state_watch();
        state
            .wait_for(|s| *s == LinkState::Retrying { attempt: 1 })
            .await
            .expect("channel task alive");

        // Act: a send during the backoff sleep doubles as a wake trigger
        handle.send(Command::LeftClick);

        // Assert: the second attempt happens well before the 1 s backoff
        // would have elapsed on its own
        tokio::time::timeout(
            std::time::Duration::from_millis(700),
            state.wait_for(|s| *s == LinkState::Retrying { attempt: 2 }),
        )
        .await
        .expect("woken attempt happened promptly")
        .expect("channel task alive");

        drop(handle);
        task.abort();
    }

    #[tokio::test]
    async fn test_dropping_every_handle_stops_the_task() {
        let (port, _server) = one_shot_server().await;
        let (handle, task) = spawn_channel(ChannelConfig::new(format!("ws://127.0.0.1:{port}")));

        let mut state = handle.state_watch();
        state.wait_for(|s| *s == LinkState::Open).await.unwrap();

        drop(state);
        drop(handle);

        // The task notices the closed queue and exits on its own
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .expect("task exited")
            .unwrap();
    }
}
