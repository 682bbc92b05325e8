//! All Touchpad-Over-IP command types.
//!
//! The wire representation is a flat JSON object whose `"command"` field names
//! the kind and whose remaining fields are the payload.  For example:
//!
//! ```json
//! {"command":"move","dx":-3.5,"dy":7.25}
//! {"command":"shortcut","keys":["control","c"]}
//! {"command":"leftClick"}
//! ```
//!
//! Serde's `#[serde(tag = "command")]` attribute handles the discriminant;
//! `rename_all = "camelCase"` keeps the kind strings identical to what the
//! host executor switches on.

use serde::{Deserialize, Serialize};

/// All valid commands, discriminated by kind.
///
/// In `Shortcut`, the last entry of `keys` is the primary key and every
/// preceding entry is a modifier, e.g. `["control", "shift", "v"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Relative cursor displacement, already accelerated and speed-scaled.
    Move { dx: f64, dy: f64 },
    /// Single left click at the current cursor position.
    LeftClick,
    /// Single right click at the current cursor position.
    RightClick,
    /// Press the primary button (start of a drag bracket).
    MouseDown,
    /// Release the primary button (end of a drag bracket).
    MouseUp,
    /// Discrete scroll units.  `dx` is reserved and always 0.
    Scroll { dx: i32, dy: i32 },
    /// Chorded key press: modifiers first, primary key last.
    Shortcut { keys: Vec<String> },
    /// Place `text` in the host clipboard, then issue a paste chord.
    TypeAll { text: String },
    /// Place `text` in the host clipboard only.
    Copy { text: String },
    /// Keep-alive; no executor action.
    Heartbeat,
}

impl Command {
    /// Returns the wire kind string for this command.
    ///
    /// Used in log messages so field values (e.g. clipboard text) are never
    /// written to the log by accident.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Move { .. } => "move",
            Command::LeftClick => "leftClick",
            Command::RightClick => "rightClick",
            Command::MouseDown => "mouseDown",
            Command::MouseUp => "mouseUp",
            Command::Scroll { .. } => "scroll",
            Command::Shortcut { .. } => "shortcut",
            Command::TypeAll { .. } => "typeAll",
            Command::Copy { .. } => "copy",
            Command::Heartbeat => "heartbeat",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
