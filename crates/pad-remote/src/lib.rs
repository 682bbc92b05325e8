//! # pad-remote
//!
//! The remote (handheld) side of Touchpad-Over-IP.  Contact events from the
//! touch surface run through the shared gesture engine; the resulting
//! commands leave over a self-healing WebSocket channel to the host.
//!
//! Layers, innermost first:
//!
//! - **`domain`** – The contact event trace format and the channel
//!   lifecycle state machine (retry backoff policy).
//!
//! - **`application`** – [`RemoteSession`](application::session::RemoteSession):
//!   gesture input plus the direct operations (send text, copy, shortcuts,
//!   drag lock), writing to a [`CommandSink`](application::session::CommandSink).
//!
//! - **`infrastructure`** – The channel task that implements the sink over
//!   WebSocket, and TOML settings persistence.

pub mod application;
pub mod domain;
pub mod infrastructure;
