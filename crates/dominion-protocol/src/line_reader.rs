//! Turn reader.
//!
//! Reads engine output one line at a time and hands back everything up to
//! and including the `response?` sentinel. Nothing past the sentinel is
//! consumed, so the same stream can be read again for the next turn.

use dominion_core::Line;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

use crate::error::ProtocolError;
use crate::markers::SENTINEL;

/// Buffered reader over the engine's stdout.
///
/// Partial progress (the bytes of an unfinished line and the lines of an
/// unfinished turn) lives in the reader, not in the `read_turn` future.
/// A `read_turn` dropped mid-turn, e.g. by a timeout, therefore loses
/// nothing: the next call picks up where the dropped one stopped.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    pending: Vec<Line>,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            buf: Vec::with_capacity(256),
            pending: Vec::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Lines of the current turn read so far by an interrupted call.
    pub fn pending_lines(&self) -> usize {
        self.pending.len()
    }

    /// Read one turn: every line up to and including the sentinel.
    ///
    /// Cancel safe. On error the partial turn is discarded.
    pub async fn read_turn(&mut self) -> Result<Vec<Line>, ProtocolError> {
        let result = self.fill_turn().await;
        if result.is_err() {
            self.pending.clear();
            self.buf.clear();
        }
        result
    }

    async fn fill_turn(&mut self) -> Result<Vec<Line>, ProtocolError> {
        loop {
            // `read_until` appends, so bytes from a dropped call are kept.
            self.inner.read_until(b'\n', &mut self.buf).await?;
            if self.buf.is_empty() {
                return Err(ProtocolError::UnexpectedEndOfStream {
                    lines_read: self.pending.len(),
                });
            }

            let raw = strip_terminator(&self.buf).to_vec();
            self.buf.clear();
            let text = String::from_utf8(raw).map_err(|source| ProtocolError::Decode {
                line: self.pending.len() + 1,
                source,
            })?;
            trace!(line = %text, "engine");

            let line = Line::from(text);
            let is_sentinel = line == SENTINEL;
            self.pending.push(line);

            if is_sentinel {
                return Ok(std::mem::take(&mut self.pending));
            }
        }
    }
}

/// One-shot variant of [`LineReader::read_turn`].
pub async fn read_turn_input<R>(stream: &mut R) -> Result<Vec<Line>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    LineReader::new(stream).read_turn().await
}

/// Drop one line terminator (`\n` or `\r\n`) from the end of `bytes`.
pub(crate) fn strip_terminator(bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\r\n") {
        rest
    } else if let Some(rest) = bytes.strip_suffix(b"\n") {
        rest
    } else {
        bytes
    }
}
