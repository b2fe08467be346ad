//! Client management system
//!
//! Handles connected chat clients: the shared registry, per-client
//! sessions and the read loop that serves them.

pub mod handler;
pub mod registry;
pub mod session;

pub use handler::{DisconnectReason, serve};
pub use registry::{ClientInfo, ClientRegistry, SessionId, SharedRegistry};
pub use session::{Session, TcpSession};
