//! Application layer: the remote session and its outbound seam.

pub mod session;
