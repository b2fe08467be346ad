//! Client session management
//!
//! A `Session` owns everything the server holds for one connected
//! client: its registry entry, its display name and both halves of its
//! connection. It is consumed by `cleanup`, so a session can only ever
//! be released once.

use log::{debug, warn};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::client::registry::{SessionId, SharedRegistry};
use crate::middleware::logging::{log_connection, log_disconnect, log_release_failure};
use crate::protocol::decode_line;

/// Session backed by an accepted TCP connection
pub type TcpSession = Session<BufReader<OwnedReadHalf>, OwnedWriteHalf>;

/// One connected client, from registration until cleanup.
pub struct Session<R, W> {
    id: SessionId,
    name: String,
    reader: R,
    writer: W,
    registry: SharedRegistry,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Registers a client whose handshake completed and wraps its connection.
    ///
    /// The registry lock is released before this returns.
    pub async fn register(
        registry: SharedRegistry,
        name: String,
        peer_addr: Option<SocketAddr>,
        reader: R,
        writer: W,
    ) -> Self {
        let id = registry.lock().await.register(name.clone(), peer_addr);
        log_connection(&name, peer_addr.as_ref());

        Self {
            id,
            name,
            reader,
            writer,
            registry,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the next raw line, terminator included.
    ///
    /// Returns `Ok(None)` once the client has closed its side.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(decode_line(&buf)))
    }

    /// Unregisters the session and releases its connection.
    ///
    /// Every resource is released even if an earlier one failed; failures
    /// are logged and never returned.
    pub async fn cleanup(self) {
        let Session {
            id,
            name,
            reader,
            mut writer,
            registry,
        } = self;

        let removed = registry.lock().await.remove(id);
        match removed {
            Some(info) => match info.peer_addr() {
                Some(addr) => debug!(
                    "Session {} ({} from {}) lasted {:?}",
                    id,
                    name,
                    addr,
                    info.connected_at().elapsed()
                ),
                None => debug!(
                    "Session {} ({}) lasted {:?}",
                    id,
                    name,
                    info.connected_at().elapsed()
                ),
            },
            None => warn!("Session {} ({}) was already unregistered", id, name),
        }

        if let Err(e) = writer.shutdown().await {
            log_release_failure(&name, "output", &e);
        }
        drop(writer);
        drop(reader);
        debug!("Released connection for session {}", id);

        log_disconnect(&name);
    }
}
