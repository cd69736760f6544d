//! Game-state parser.
//!
//! Walks one turn's lines left to right. A line equal to one of the
//! section markers opens a block; the block runs until the next `@` line,
//! the sentinel, or the end of input. Lines outside any block are skipped.
//!
//! Block lines are split with one of two grammars:
//!
//! - preliminary: `*key: value*`
//! - card blocks: `*card, count*`
//!
//! Parsing never fails. A line missing a delimiter is stored with an empty
//! key and/or value, logged, and counted in the [`ParseReport`].

use dominion_core::{
    Block, BlockKind, DuplicateBlockPolicy, EntryGrammar, GameStateSnapshot, SnapshotBuilder,
};
use tracing::{debug, trace, warn};

use crate::markers::{self, ENTRY_DELIMITER, MARKER_PREFIX, SENTINEL};

/// Knobs for a parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub duplicate_blocks: DuplicateBlockPolicy,
}

/// Counters describing what the parser had to tolerate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Block lines missing the key or value delimiter.
    pub malformed_entries: usize,
    /// Block markers seen more than once in the same turn.
    pub duplicate_blocks: usize,
    /// Keys repeated inside one block (later value kept).
    pub duplicate_keys: usize,
    /// Lines outside any block, sentinel excluded.
    pub ignored_lines: usize,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.malformed_entries == 0 && self.duplicate_blocks == 0 && self.duplicate_keys == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub snapshot: GameStateSnapshot,
    pub report: ParseReport,
}

/// Parse one turn with default options (later duplicate blocks win).
pub fn parse<L: AsRef<str>>(lines: &[L]) -> GameStateSnapshot {
    parse_with(lines, &ParseOptions::default()).snapshot
}

/// Parse one turn and report what had to be tolerated along the way.
pub fn parse_with<L: AsRef<str>>(lines: &[L], options: &ParseOptions) -> ParseOutcome {
    let mut builder = SnapshotBuilder::new(options.duplicate_blocks);
    let mut report = ParseReport::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref();

        let Some(kind) = markers::block_for_marker(line) else {
            if line != SENTINEL {
                report.ignored_lines += 1;
                if line.starts_with(MARKER_PREFIX) {
                    debug!(marker = line, "skipping unrecognized section marker");
                } else {
                    trace!(line, "skipping line outside any block");
                }
            }
            i += 1;
            continue;
        };

        let (block, next) = extract_block(kind, lines, i + 1, &mut report);
        let stored = builder.insert_block(kind, block);
        if stored.is_duplicate() {
            report.duplicate_blocks += 1;
            warn!(
                block = %kind,
                policy = ?options.duplicate_blocks,
                "section marker repeated within one turn"
            );
        }
        i = next;
    }

    if !report.is_clean() {
        debug!(?report, "turn parsed with tolerated defects");
    }

    ParseOutcome {
        snapshot: builder.finish(),
        report,
    }
}

/// Read entries for `kind` starting at `start`; returns the block and the
/// index of the first line not consumed.
fn extract_block<L: AsRef<str>>(
    kind: BlockKind,
    lines: &[L],
    start: usize,
    report: &mut ParseReport,
) -> (Block, usize) {
    let grammar = kind.grammar();
    let mut block = Block::new();
    let mut i = start;

    while i < lines.len() && !markers::ends_block(lines[i].as_ref()) {
        let line = lines[i].as_ref();
        let entry = extract_entry(line, grammar);

        if entry.is_malformed() {
            report.malformed_entries += 1;
            warn!(block = %kind, line, "malformed entry, recording empty field");
        }

        let (key, value) = entry.into_pair();
        if let Some(previous) = block.insert(key, value) {
            report.duplicate_keys += 1;
            debug!(block = %kind, line, %previous, "duplicate key, keeping later value");
        }
        i += 1;
    }

    (block, i)
}

/// Key and value found on one block line; `None` where a delimiter was
/// missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub key: Option<&'a str>,
    pub value: Option<&'a str>,
}

impl RawEntry<'_> {
    pub fn is_malformed(&self) -> bool {
        self.key.is_none() || self.value.is_none()
    }

    /// Owned pair, with missing fields as empty strings.
    pub fn into_pair(self) -> (String, String) {
        (
            self.key.unwrap_or_default().to_string(),
            self.value.unwrap_or_default().to_string(),
        )
    }
}

/// Split one block line using `grammar`.
///
/// The key runs from the first `*` to the first key delimiter after it;
/// the value runs from the first value delimiter after that `*` to the
/// next `*`.
pub fn extract_entry(line: &str, grammar: EntryGrammar) -> RawEntry<'_> {
    let Some(open) = line.find(ENTRY_DELIMITER) else {
        return RawEntry {
            key: None,
            value: None,
        };
    };
    let body = &line[open + ENTRY_DELIMITER.len_utf8()..];

    let key = body
        .find(grammar.key_delimiter())
        .map(|end| &body[..end]);

    let value_delimiter = grammar.value_delimiter();
    let value = body.find(value_delimiter).and_then(|start| {
        let rest = &body[start + value_delimiter.len()..];
        rest.find(ENTRY_DELIMITER).map(|end| &rest[..end])
    });

    RawEntry { key, value }
}
