//! Server core functionality
//!
//! This module contains the connection acceptor and the name handshake
//! every new connection goes through before it is registered.

pub mod core;
pub mod handshake;

pub use self::core::Server;
