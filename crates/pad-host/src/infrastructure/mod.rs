//! Infrastructure layer: the WebSocket command listener and the default
//! injector implementation.

pub mod injector;
pub mod ws_server;
