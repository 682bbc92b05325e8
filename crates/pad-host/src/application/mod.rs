//! Application layer: command dispatch behind the injector seam.

pub mod dispatch;
