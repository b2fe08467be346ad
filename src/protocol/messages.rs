//! Chat message parsing
//!
//! Turns raw lines read from a client into chat messages.

/// Message that ends a client's session, matched case-insensitively
pub const EXIT_COMMAND: &str = "exit";

/// A line received from a connected client
#[derive(Debug, PartialEq, Eq)]
pub enum ChatLine {
    /// A regular message to be logged
    Message(String),
    /// The exit message; carries the text as the client typed it
    Exit(String),
}

impl ChatLine {
    /// The message text without its line terminator
    pub fn text(&self) -> &str {
        match self {
            ChatLine::Message(text) | ChatLine::Exit(text) => text,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, ChatLine::Exit(_))
    }
}

/// Remove a trailing `\n` or `\r\n`
pub fn strip_line_ending(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Decode raw line bytes, replacing invalid UTF-8 sequences
pub fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse a raw line (terminator included or not) into a ChatLine
pub fn parse_line(raw: &str) -> ChatLine {
    let text = strip_line_ending(raw);

    if text.eq_ignore_ascii_case(EXIT_COMMAND) {
        ChatLine::Exit(text.to_string())
    } else {
        ChatLine::Message(text.to_string())
    }
}
