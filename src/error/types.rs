//! Error types
//!
//! Defines the errors raised while starting the server and while
//! setting up a client connection.

use std::fmt;
use std::io;

/// Name handshake errors
///
/// Any of these drops the connection before it is registered.
#[derive(Debug)]
pub enum HandshakeError {
    /// The client closed the connection before sending a name line
    Closed,
    EmptyName,
    NameTooLong { len: usize, max: usize },
    Io(io::Error),
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::Closed => write!(f, "Client disconnected before sending a name"),
            HandshakeError::EmptyName => write!(f, "Client sent an empty name"),
            HandshakeError::NameTooLong { len, max } => {
                write!(f, "Name too long: {} bytes (max {})", len, max)
            }
            HandshakeError::Io(e) => write!(f, "I/O error during handshake: {}", e),
        }
    }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandshakeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HandshakeError {
    fn from(error: io::Error) -> Self {
        HandshakeError::Io(error)
    }
}

/// General chat server error that encompasses all error types
#[derive(Debug)]
pub enum ChatServerError {
    Config(config::ConfigError),
    Bind { addr: String, source: io::Error },
    Accept(io::Error),
    Handshake(HandshakeError),
}

impl fmt::Display for ChatServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ChatServerError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            ChatServerError::Accept(e) => write!(f, "Error accepting connection: {}", e),
            ChatServerError::Handshake(e) => write!(f, "Handshake error: {}", e),
        }
    }
}

impl std::error::Error for ChatServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatServerError::Config(e) => Some(e),
            ChatServerError::Bind { source, .. } => Some(source),
            ChatServerError::Accept(e) => Some(e),
            ChatServerError::Handshake(e) => Some(e),
        }
    }
}

impl From<config::ConfigError> for ChatServerError {
    fn from(error: config::ConfigError) -> Self {
        ChatServerError::Config(error)
    }
}

impl From<HandshakeError> for ChatServerError {
    fn from(error: HandshakeError) -> Self {
        ChatServerError::Handshake(error)
    }
}
