//! Name handshake
//!
//! The first line a client sends is its display name.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::HandshakeError;
use crate::protocol::{decode_line, strip_line_ending};

/// Reads the client's display name from the first line of the connection.
///
/// Surrounding whitespace is trimmed. Waits as long as the client takes;
/// there is no handshake timeout. At most `max_len` bytes plus a `\r\n`
/// terminator are buffered, so a line that runs past that is rejected
/// without reading the rest of it.
pub async fn read_name<R>(reader: &mut R, max_len: usize) -> Result<String, HandshakeError>
where
    R: AsyncBufRead + Unpin,
{
    let limit = max_len.saturating_add(2);
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(limit as u64)
        .read_until(b'\n', &mut buf)
        .await?;
    if n == 0 {
        return Err(HandshakeError::Closed);
    }
    if n == limit && !buf.ends_with(b"\n") {
        return Err(HandshakeError::NameTooLong { len: n, max: max_len });
    }

    let raw = decode_line(&buf);
    let name = strip_line_ending(&raw).trim();

    if name.is_empty() {
        return Err(HandshakeError::EmptyName);
    }
    if name.len() > max_len {
        return Err(HandshakeError::NameTooLong {
            len: name.len(),
            max: max_len,
        });
    }

    Ok(name.to_string())
}
