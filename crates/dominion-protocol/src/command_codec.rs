//! Move encoding.
//!
//! A move is a single line: the token text followed by `\n`. The engine
//! blocks on its stdin until that line arrives, so every write is flushed.

use bytes::{BufMut, Bytes, BytesMut};
use dominion_core::MoveToken;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::ProtocolError;
use crate::line_reader::strip_terminator;

pub const LINE_TERMINATOR: u8 = b'\n';

/// Encode `mv` as the line the engine expects.
pub fn encode_move(mv: &MoveToken) -> Bytes {
    let text = mv.as_str().as_bytes();
    let mut buf = BytesMut::with_capacity(text.len() + 1);
    buf.put_slice(text);
    buf.put_u8(LINE_TERMINATOR);
    buf.freeze()
}

/// Inverse of [`encode_move`]: decode one move line.
pub fn decode_move(bytes: &[u8]) -> Result<MoveToken, ProtocolError> {
    let text = String::from_utf8(strip_terminator(bytes).to_vec())
        .map_err(|source| ProtocolError::Decode { line: 1, source })?;
    Ok(MoveToken::from(text))
}

/// Write `mv` to the engine and flush.
pub async fn write_move<W>(writer: &mut W, mv: &MoveToken) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let data = encode_move(mv);
    writer.write_all(&data).await?;
    writer.flush().await?;

    debug!(mv = %mv, "sent move");
    Ok(())
}
