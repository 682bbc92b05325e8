//! Infrastructure layer: the WebSocket command channel and settings
//! persistence.

pub mod channel;
pub mod storage;
