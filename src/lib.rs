pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;

pub use crate::config::ServerConfig;
pub use error::{ChatServerError, HandshakeError};
pub use server::Server;
