//! Errors raised while reading a turn or decoding a move.
//!
//! Malformed block lines are *not* errors: the parser records them with
//! empty fields and reports them through `ParseReport` and the log.

use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The stream closed before `response?` was seen.
    #[error("stream ended before the turn sentinel ({lines_read} line(s) read)")]
    UnexpectedEndOfStream { lines_read: usize },

    /// A line was not valid UTF-8. `line` is 1-based within the turn.
    #[error("line {line} is not valid UTF-8")]
    Decode {
        line: usize,
        #[source]
        source: FromUtf8Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// True when the engine closed its output cleanly between two turns.
    pub fn is_clean_end_of_stream(&self) -> bool {
        matches!(self, ProtocolError::UnexpectedEndOfStream { lines_read: 0 })
    }
}
