//! Error handlers
//!
//! Reports errors and maps fatal ones to process exit codes.

use crate::error::types::ChatServerError;
use log::error;

/// Report a chat server error on the diagnostic channel
pub fn handle_error(err: &ChatServerError) {
    error!("Chat Server Error: {}", err);
}

/// Convert a fatal error to the process exit code
pub fn exit_code(err: &ChatServerError) -> u8 {
    match err {
        ChatServerError::Config(_) => 2,
        ChatServerError::Bind { .. } => 1,
        ChatServerError::Accept(_) => 1,
        ChatServerError::Handshake(_) => 1,
    }
}
