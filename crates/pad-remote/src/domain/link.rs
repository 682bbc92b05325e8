//! Command channel lifecycle state machine.
//!
//! The channel is either open or it is not, and while it is not, commands
//! are dropped rather than queued: gesture input is only meaningful in the
//! moment it happens, and a burst of stale moves replayed after a reconnect
//! would throw the host pointer around.
//!
//! All lifecycle transitions go through [`LinkSupervisor`].  The async
//! runner in the infrastructure layer owns the socket and the timers but
//! never computes a delay or mutates an attempt counter itself; that keeps
//! the retry policy in one testable place.

use std::time::Duration;

/// First retry delay after a connection loss.
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Multiplier applied to the retry delay per consecutive failure.
pub const RETRY_BACKOFF_FACTOR: f64 = 1.5;

/// Upper bound on the retry delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Consecutive failures after which the channel stops retrying on its own.
/// A suspended channel waits for an external trigger (a forced reconnect,
/// or a send attempted while down) before dialing again.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Interval between application-level heartbeats on an open channel.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Where the command channel currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection attempt has been made yet.
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// The channel is open; commands flow and heartbeats tick.
    Open,
    /// The last attempt failed or the connection dropped; the runner is
    /// sleeping out the retry delay for the recorded attempt number.
    Retrying { attempt: u32 },
    /// The retry budget is exhausted.  The runner dials again only when an
    /// external trigger arrives.
    Suspended,
}

/// Pure lifecycle policy for the command channel.
#[derive(Debug)]
pub struct LinkSupervisor {
    state: LinkState,
    /// Consecutive failed attempts since the channel was last open.
    failures: u32,
}

impl Default for LinkSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkSupervisor {
    pub fn new() -> Self {
        Self {
            state: LinkState::Idle,
            failures: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    /// Records that a connection attempt has started.
    pub fn on_connecting(&mut self) {
        self.state = LinkState::Connecting;
    }

    /// Records a successful open.  Resets the failure streak so the next
    /// loss starts backoff from the beginning.
    pub fn on_open(&mut self) {
        self.state = LinkState::Open;
        self.failures = 0;
    }

    /// Records a connection loss or failed attempt.  Returns how long the
    /// runner must wait before the next attempt, or `None` once the retry
    /// budget is exhausted and the channel should suspend.
    pub fn on_lost(&mut self) -> Option<Duration> {
        if self.failures >= MAX_RETRY_ATTEMPTS {
            self.state = LinkState::Suspended;
            return None;
        }
        let delay = retry_delay(self.failures);
        self.failures = self.failures.saturating_add(1);
        self.state = LinkState::Retrying {
            attempt: self.failures,
        };
        Some(delay)
    }

    /// Records an external reconnect trigger (the surface regaining focus,
    /// a send attempted while down, the user tapping retry).  Grants one
    /// near-immediate attempt; the failure streak only resets on a
    /// successful open.
    pub fn on_forced_reconnect(&mut self) {
        self.state = LinkState::Connecting;
    }
}

/// Delay before retry number `failures + 1`.
///
/// Grows as `1 s × 1.5^failures`, capped at [`MAX_RETRY_DELAY`].
pub fn retry_delay(failures: u32) -> Duration {
    let exponent = failures.min(MAX_RETRY_ATTEMPTS);
    let unbounded = INITIAL_RETRY_DELAY.as_secs_f64() * RETRY_BACKOFF_FACTOR.powi(exponent as i32);
    Duration::from_secs_f64(unbounded.min(MAX_RETRY_DELAY.as_secs_f64()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
