//! Command dispatch: decoded wire frames to injector calls.
//!
//! The dispatcher sits between the WebSocket session and the OS.  It owns
//! the forward-compatibility policy of the protocol: frames that are
//! malformed or name an unknown command kind are logged and dropped, never
//! grounds for closing the session.  A newer remote talking to an older
//! host degrades to the commands both sides know.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use pad_core::{decode_command, Command, ProtocolError};

/// Error type for OS-level input injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Seam to whatever actually performs input on the host.
///
/// The real implementation wraps an OS automation backend; the default
/// build ships a logging stand-in, and tests use a mock.  Deltas arrive
/// pre-scaled and pre-accelerated; the injector applies them as-is.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    /// Moves the pointer by a relative delta.
    fn move_pointer(&self, dx: f64, dy: f64) -> Result<(), InjectionError>;

    /// Clicks the left button.
    fn left_click(&self) -> Result<(), InjectionError>;

    /// Clicks the right button.
    fn right_click(&self) -> Result<(), InjectionError>;

    /// Presses the left button and holds it.
    fn button_down(&self) -> Result<(), InjectionError>;

    /// Releases the left button.
    fn button_up(&self) -> Result<(), InjectionError>;

    /// Scrolls by whole units.
    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses a key chord (all keys down, then all up in reverse).
    fn key_chord(&self, keys: &[String]) -> Result<(), InjectionError>;

    /// Types a string as keystrokes.
    fn type_text(&self, text: &str) -> Result<(), InjectionError>;

    /// Replaces the host clipboard contents.
    fn set_clipboard(&self, text: &str) -> Result<(), InjectionError>;
}

/// Translates wire frames into injector calls.
pub struct CommandDispatcher {
    injector: Arc<dyn InputInjector>,
}

impl CommandDispatcher {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Handles one wire frame.
    ///
    /// Protocol-level problems (malformed frames, unknown kinds) are logged
    /// and swallowed.  Only an injection failure is returned, and even that
    /// is a per-frame condition the session logs and survives.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] when the injector rejects the operation.
    pub fn dispatch_frame(&self, frame: &str) -> Result<(), InjectionError> {
        let command = match decode_command(frame) {
            Ok(command) => command,
            Err(ProtocolError::UnknownCommand { kind }) => {
                warn!(kind = %kind, "ignoring unknown command kind");
                return Ok(());
            }
            Err(ProtocolError::Malformed(reason)) => {
                warn!(reason = %reason, "dropping malformed frame");
                return Ok(());
            }
        };
        self.dispatch(command)
    }

    /// Handles one decoded command.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] when the injector rejects the operation.
    pub fn dispatch(&self, command: Command) -> Result<(), InjectionError> {
        debug!(kind = command.kind(), "dispatching");
        match command {
            Command::Move { dx, dy } => self.injector.move_pointer(dx, dy),
            Command::LeftClick => self.injector.left_click(),
            Command::RightClick => self.injector.right_click(),
            Command::MouseDown => self.injector.button_down(),
            Command::MouseUp => self.injector.button_up(),
            Command::Scroll { dx, dy } => self.injector.scroll(dx, dy),
            Command::Shortcut { keys } => self.injector.key_chord(&keys),
            Command::TypeAll { text } => self.injector.type_text(&text),
            Command::Copy { text } => self.injector.set_clipboard(&text),
            Command::Heartbeat => {
                // Liveness only; the session layer already refreshed its
                // idle deadline by receiving the frame.
                trace!("heartbeat");
                Ok(())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
