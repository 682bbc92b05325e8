//! Domain layer: pure types and policies with no I/O.

pub mod events;
pub mod link;
