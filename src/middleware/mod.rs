//! Server middleware
//!
//! Provides the console event log shared by the acceptor and session handlers.

pub mod logging;
