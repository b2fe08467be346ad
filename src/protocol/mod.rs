//! Chat line protocol
//!
//! Newline-delimited text: the first line is the client's name, every
//! following line is a chat message.

pub mod messages;

pub use messages::{ChatLine, EXIT_COMMAND, decode_line, parse_line, strip_line_ending};
