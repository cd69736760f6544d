//! Turn loop.
//!
//! One turn is: read engine output up to `response?`, parse it, let the
//! policy pick a move, hand the result to an observer (for printing), then
//! write the move and flush. Turns run strictly one after another.

use std::time::Duration;

use dominion_core::{GameStateSnapshot, Line, MoveToken};
use dominion_protocol::{
    parse_with, write_move, LineReader, ParseOptions, ParseReport, ProtocolError,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::decision::MovePolicy;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("turn {turn}: {source}")]
    Protocol {
        turn: u32,
        #[source]
        source: ProtocolError,
    },

    #[error("turn {turn}: engine sent no complete turn within {after_ms} ms")]
    Timeout { turn: u32, after_ms: u64 },
}

impl SessionError {
    pub fn turn(&self) -> u32 {
        match self {
            SessionError::Protocol { turn, .. } | SessionError::Timeout { turn, .. } => *turn,
        }
    }
}

/// Everything known about one completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    /// 1-based turn number within this session.
    pub turn: u32,
    pub snapshot: GameStateSnapshot,
    pub report: ParseReport,
    pub mv: MoveToken,
}

/// Engine conversation over a reader (engine stdout) and a writer
/// (engine stdin).
pub struct Session<R, W, P> {
    reader: LineReader<R>,
    writer: W,
    policy: P,
    options: ParseOptions,
    read_timeout: Option<Duration>,
    turns_played: u32,
}

impl<R, W, P> Session<R, W, P>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: MovePolicy,
{
    pub fn new(reader: R, writer: W, policy: P) -> Self {
        Session {
            reader: LineReader::new(reader),
            writer,
            policy,
            options: ParseOptions::default(),
            read_timeout: None,
            turns_played: 0,
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }

    /// Play a single turn, calling `observe` before the move is sent.
    pub async fn play_turn<F>(&mut self, observe: F) -> Result<TurnRecord, SessionError>
    where
        F: FnOnce(&TurnRecord),
    {
        let turn = self.turns_played + 1;

        let lines = self.read_turn(turn).await?;
        debug!(turn, lines = lines.len(), "turn received");

        let outcome = parse_with(&lines, &self.options);
        if outcome.report.malformed_entries > 0 {
            warn!(
                turn,
                malformed = outcome.report.malformed_entries,
                "turn contained malformed entries"
            );
        }

        let mv = self.policy.choose(&outcome.snapshot);
        let record = TurnRecord {
            turn,
            snapshot: outcome.snapshot,
            report: outcome.report,
            mv,
        };
        observe(&record);

        write_move(&mut self.writer, &record.mv)
            .await
            .map_err(|source| SessionError::Protocol { turn, source })?;

        self.turns_played = turn;
        info!(
            turn,
            phase = record.snapshot.phase().unwrap_or("?"),
            mv = %record.mv,
            "turn answered"
        );
        Ok(record)
    }

    /// Play up to `max_turns` turns (`0` = until the engine closes its
    /// output between turns). Returns the number of turns played.
    pub async fn run<F>(&mut self, max_turns: u32, mut observe: F) -> Result<u32, SessionError>
    where
        F: FnMut(&TurnRecord),
    {
        let start = self.turns_played;

        while max_turns == 0 || self.turns_played - start < max_turns {
            match self.play_turn(&mut observe).await {
                Ok(_) => {}
                Err(SessionError::Protocol { source, .. })
                    if max_turns == 0 && source.is_clean_end_of_stream() =>
                {
                    info!(turns = self.turns_played - start, "engine closed its output");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.turns_played - start)
    }

    /// A timed-out read keeps what it has; calling `play_turn` again
    /// continues the same turn.
    async fn read_turn(&mut self, turn: u32) -> Result<Vec<Line>, SessionError> {
        let read = self.reader.read_turn();
        let result = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| SessionError::Timeout {
                    turn,
                    after_ms: limit.as_millis() as u64,
                })?,
            None => read.await,
        };
        result.map_err(|source| SessionError::Protocol { turn, source })
    }
}
