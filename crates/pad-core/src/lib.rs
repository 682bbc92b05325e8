//! # pad-core
//!
//! Shared library for Touchpad-Over-IP containing the command wire protocol,
//! the persisted settings schema, and the gesture recognition engine.
//!
//! This crate is used by both the remote (handheld) and host applications.
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! The three top-level modules:
//!
//! - **`protocol`** – The JSON command objects that travel over the command
//!   channel, plus the encode/decode helpers and their error taxonomy.
//!
//! - **`domain`** – The flat record of user-facing tunables
//!   ([`TouchSettings`]) that the gesture engine reads live on every sample.
//!
//! - **`gesture`** – Pure gesture recognition: the pointer tracker, the
//!   single- and two-contact classifiers, the scroll quantizer, and the
//!   [`GestureEngine`] that composes them.  Everything here is synchronous
//!   and driven by explicit timestamps, so it is deterministically testable.

pub mod domain;
pub mod gesture;
pub mod protocol;

pub use domain::settings::TouchSettings;
pub use gesture::engine::GestureEngine;
pub use protocol::codec::{decode_command, encode_command, ProtocolError};
pub use protocol::commands::Command;
