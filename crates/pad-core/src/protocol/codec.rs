//! Encoding and decoding of commands to/from wire JSON.
//!
//! Decoding distinguishes a *malformed* frame (not a JSON object, or fields
//! of the wrong shape) from an *unknown* command kind.  Unknown kinds are a
//! forward-compatible no-op at the host: the caller logs the kind and drops
//! the frame without closing the session.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::commands::Command;

/// Error type for wire encode/decode operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON, lacks the `command` field, or has a
    /// payload that does not match its kind.
    #[error("malformed command frame: {0}")]
    Malformed(String),

    /// The frame is well-formed but names a command kind this version does
    /// not understand.
    #[error("unknown command kind: {kind}")]
    UnknownCommand { kind: String },
}

/// Encodes a command as a single-line JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if serialization fails, which for
/// these types indicates a bug rather than bad input.
pub fn encode_command(command: &Command) -> Result<String, ProtocolError> {
    serde_json::to_string(command).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Decodes one wire frame into a [`Command`].
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownCommand`] when the frame carries a
/// `command` kind this version does not know, and
/// [`ProtocolError::Malformed`] for anything else that fails to parse.
pub fn decode_command(frame: &str) -> Result<Command, ProtocolError> {
    match serde_json::from_str::<Command>(frame) {
        Ok(cmd) => Ok(cmd),
        Err(e) => {
            // Tell the two failure classes apart: if the frame parses as a
            // JSON object with a string `command` field that is not one of
            // ours, report the kind so the caller can log-and-ignore it.
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(frame) {
                if let Some(Value::String(kind)) = map.get("command") {
                    if !is_known_kind(kind) {
                        return Err(ProtocolError::UnknownCommand { kind: kind.clone() });
                    }
                }
            }
            Err(ProtocolError::Malformed(e.to_string()))
        }
    }
}

fn is_known_kind(kind: &str) -> bool {
    matches!(
        kind,
        "move"
            | "leftClick"
            | "rightClick"
            | "mouseDown"
            | "mouseUp"
            | "scroll"
            | "shortcut"
            | "typeAll"
            | "copy"
            | "heartbeat"
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
