//! Command channel wire protocol.
//!
//! Commands are plain JSON objects discriminated by a `"command"` field, one
//! object per WebSocket text frame.  Delivery is fire-and-forget: no command
//! carries a sequence number or requires acknowledgement.

pub mod codec;
pub mod commands;
