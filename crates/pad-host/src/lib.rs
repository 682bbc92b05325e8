//! # pad-host
//!
//! The host (desktop) side of Touchpad-Over-IP.  Listens for the remote's
//! WebSocket command channel, decodes command frames, and dispatches them
//! to an [`InputInjector`](application::dispatch::InputInjector)
//! implementation.
//!
//! - **`application`** – The dispatcher and the injector seam.  Protocol
//!   forward compatibility (unknown kinds are logged and dropped) lives
//!   here.
//!
//! - **`infrastructure`** – The accept loop with per-session tasks and
//!   idle timeout, plus the logging injector used when no OS backend is
//!   wired in.

pub mod application;
pub mod infrastructure;
