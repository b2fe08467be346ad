//! Logging middleware
//!
//! Keeps the wording of the server's console events in one place.

use log::{error, info};
use std::net::SocketAddr;

/// Log that the listening socket is ready
pub fn log_server_running(addr: &SocketAddr) {
    info!("Chat server running on {}", addr);
}

/// Log a client that completed the name handshake
pub fn log_connection(name: &str, peer_addr: Option<&SocketAddr>) {
    match peer_addr {
        Some(addr) => info!("Client connected: {} ({})", name, addr),
        None => info!("Client connected: {}", name),
    }
}

/// Log a chat message received from a client
pub fn log_message(name: &str, message: &str) {
    info!("{} said: {}", name, message);
}

/// Log a client leaving, whatever the cause
pub fn log_disconnect(name: &str) {
    info!("{} disconnected.", name);
}

/// Log a failure to release one of a session's resources
pub fn log_release_failure(name: &str, resource: &str, err: &std::io::Error) {
    error!("Cleanup error for {} ({}): {}", name, resource, err);
}
