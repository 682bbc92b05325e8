//! Domain types shared by the remote and host applications.

pub mod settings;
