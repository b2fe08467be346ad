use log::{debug, error};
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::client::session::Session;
use crate::middleware::logging::log_message;
use crate::protocol::parse_line;

/// Why a session's read loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client sent the exit message
    Exit,
    /// End of stream
    Closed,
    /// Reading from the client failed
    ReadFailed,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectReason::Exit => write!(f, "client sent exit"),
            DisconnectReason::Closed => write!(f, "connection closed by client"),
            DisconnectReason::ReadFailed => write!(f, "read failed"),
        }
    }
}

/// Serves one chat client until it leaves.
///
/// - Logs every received line tagged with the client's name, `exit` included.
/// - Stops on `exit` (any case), end of stream, or a read error.
/// - Always finishes with the session's cleanup, exactly once.
pub async fn serve<R, W>(mut session: Session<R, W>) -> DisconnectReason
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let reason = loop {
        match session.read_line().await {
            Ok(None) => break DisconnectReason::Closed,
            Ok(Some(raw)) => {
                let line = parse_line(&raw);
                log_message(session.name(), line.text());

                if line.is_exit() {
                    break DisconnectReason::Exit;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", session.name(), e);
                break DisconnectReason::ReadFailed;
            }
        }
    };

    debug!("Session {} ended: {}", session.id(), reason);
    session.cleanup().await;
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::registry::ClientRegistry;
    use std::io;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    /// Reader that yields some bytes, then fails
    struct FailingReader {
        data: &'static [u8],
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.data.is_empty() {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            let n = self.data.len().min(buf.remaining());
            buf.put_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    async fn session_for<R: AsyncBufRead + Unpin>(
        registry: &crate::client::SharedRegistry,
        name: &str,
        input: R,
    ) -> Session<R, tokio::io::Sink> {
        Session::register(
            Arc::clone(registry),
            name.to_string(),
            None,
            input,
            tokio::io::sink(),
        )
        .await
    }

    #[tokio::test]
    async fn test_exit_ends_session() {
        let registry = ClientRegistry::shared();
        let session = session_for(&registry, "Alice", &b"hello\nexit\nignored\n"[..]).await;

        assert_eq!(serve(session).await, DisconnectReason::Exit);
        assert!(registry.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_exit_matches_any_case() {
        let registry = ClientRegistry::shared();
        let session = session_for(&registry, "Alice", &b"EXIT\r\n"[..]).await;

        assert_eq!(serve(session).await, DisconnectReason::Exit);
    }

    #[tokio::test]
    async fn test_end_of_stream_ends_session() {
        let registry = ClientRegistry::shared();
        let session = session_for(&registry, "Bob", &b""[..]).await;

        assert_eq!(serve(session).await, DisconnectReason::Closed);
        assert!(registry.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_messages_mentioning_exit_do_not_end_session() {
        let registry = ClientRegistry::shared();
        let session = session_for(&registry, "Bob", &b"exit please\nexiting\n"[..]).await;

        assert_eq!(serve(session).await, DisconnectReason::Closed);
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_end_session() {
        let registry = ClientRegistry::shared();
        let session = session_for(&registry, "Bob", &b"\xff\xfe\nexit\n"[..]).await;

        assert_eq!(serve(session).await, DisconnectReason::Exit);
    }

    #[tokio::test]
    async fn test_read_error_still_cleans_up() {
        let registry = ClientRegistry::shared();
        let reader = BufReader::new(FailingReader { data: b"hello\n" });
        let session = session_for(&registry, "Carol", reader).await;

        assert_eq!(serve(session).await, DisconnectReason::ReadFailed);
        assert!(registry.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_serving_one_session_leaves_others_registered() {
        let registry = ClientRegistry::shared();
        let a = session_for(&registry, "A", &b"hi\nexit\n"[..]).await;
        let b = session_for(&registry, "B", &b"hey\n"[..]).await;
        let b_id = b.id();

        serve(a).await;

        let clients = registry.lock().await;
        assert_eq!(clients.names(), vec!["B"]);
        assert!(clients.contains(b_id));
    }
}
