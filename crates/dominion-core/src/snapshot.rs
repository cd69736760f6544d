//! Immutable per-turn game-state snapshot.
//!
//! A snapshot is assembled once by a [`SnapshotBuilder`] and is read-only
//! afterwards. Blocks are keyed by [`BlockKind`]; lookups by the textual
//! block name (`"player-hand"`) are also supported.

use std::fmt;
use std::str::FromStr;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockKind};

/// What to do when a block marker shows up twice in one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateBlockPolicy {
    /// The later block replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Entries of the later block are merged into the earlier one;
    /// keys from the later block win.
    Merge,
}

impl DuplicateBlockPolicy {
    pub const ALL: [DuplicateBlockPolicy; 2] =
        [DuplicateBlockPolicy::LastWriteWins, DuplicateBlockPolicy::Merge];

    /// Name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DuplicateBlockPolicy::LastWriteWins => "last-write-wins",
            DuplicateBlockPolicy::Merge => "merge",
        }
    }
}

impl fmt::Display for DuplicateBlockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DuplicateBlockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DuplicateBlockPolicy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| format!("unknown duplicate-block policy `{}`", s))
    }
}

/// How a block was stored by [`SnapshotBuilder::insert_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockInsert {
    New,
    Replaced,
    Merged,
}

impl BlockInsert {
    pub fn is_duplicate(self) -> bool {
        !matches!(self, BlockInsert::New)
    }
}

/// Parsed game state for a single turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GameStateSnapshot {
    blocks: IndexMap<BlockKind, Block>,
}

impl GameStateSnapshot {
    pub fn block(&self, kind: BlockKind) -> Option<&Block> {
        self.blocks.get(&kind)
    }

    /// Look up a block by its snapshot name, e.g. `"kingdom"`.
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.block(BlockKind::from_name(name)?)
    }

    pub fn contains(&self, kind: BlockKind) -> bool {
        self.blocks.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (BlockKind, &Block)> {
        self.blocks.iter().map(|(kind, block)| (*kind, block))
    }

    /// Raw value of a preliminary entry such as `"player"` or `"phase"`.
    pub fn preliminary(&self, key: &str) -> Option<&str> {
        self.block(BlockKind::Preliminary)?.get(key)
    }

    /// Numeric preliminary entry such as `"number of coins"`. Only entries
    /// closed by `*` carry a value; `*number of coins: 3` yields `None`.
    pub fn preliminary_number(&self, key: &str) -> Option<i64> {
        self.preliminary(key)?.trim().parse().ok()
    }

    /// Current phase (`"action"`, `"treasure"`, `"buy"`), if reported.
    pub fn phase(&self) -> Option<&str> {
        self.preliminary("phase")
    }
}

impl<const N: usize> From<[(BlockKind, Block); N]> for GameStateSnapshot {
    fn from(blocks: [(BlockKind, Block); N]) -> Self {
        GameStateSnapshot {
            blocks: blocks.into_iter().collect(),
        }
    }
}

/// Accumulates blocks for one parse pass, then yields the snapshot.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    policy: DuplicateBlockPolicy,
    blocks: IndexMap<BlockKind, Block>,
}

impl SnapshotBuilder {
    pub fn new(policy: DuplicateBlockPolicy) -> Self {
        SnapshotBuilder {
            policy,
            blocks: IndexMap::new(),
        }
    }

    /// Store a finished block, applying the duplicate policy if `kind`
    /// was already stored during this pass.
    pub fn insert_block(&mut self, kind: BlockKind, block: Block) -> BlockInsert {
        match self.blocks.entry(kind) {
            Entry::Vacant(slot) => {
                slot.insert(block);
                BlockInsert::New
            }
            Entry::Occupied(mut slot) => match self.policy {
                DuplicateBlockPolicy::LastWriteWins => {
                    slot.insert(block);
                    BlockInsert::Replaced
                }
                DuplicateBlockPolicy::Merge => {
                    slot.get_mut().merge(block);
                    BlockInsert::Merged
                }
            },
        }
    }

    pub fn finish(self) -> GameStateSnapshot {
        GameStateSnapshot {
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(pairs: &[(&str, &str)]) -> Block {
        pairs.iter().copied().collect()
    }

    #[test]
    fn last_write_wins_replaces_whole_block() {
        let mut builder = SnapshotBuilder::new(DuplicateBlockPolicy::LastWriteWins);
        assert_eq!(
            builder.insert_block(BlockKind::PlayerHand, block(&[("copper", "3")])),
            BlockInsert::New
        );
        assert_eq!(
            builder.insert_block(BlockKind::PlayerHand, block(&[("estate", "1")])),
            BlockInsert::Replaced
        );

        let snapshot = builder.finish();
        assert_eq!(
            snapshot.block(BlockKind::PlayerHand),
            Some(&block(&[("estate", "1")]))
        );
    }

    #[test]
    fn merge_keeps_earlier_keys_and_lets_later_keys_win() {
        let mut builder = SnapshotBuilder::new(DuplicateBlockPolicy::Merge);
        builder.insert_block(BlockKind::Kingdom, block(&[("village", "10"), ("smithy", "10")]));
        let outcome =
            builder.insert_block(BlockKind::Kingdom, block(&[("village", "9"), ("moat", "10")]));
        assert_eq!(outcome, BlockInsert::Merged);
        assert!(outcome.is_duplicate());

        let snapshot = builder.finish();
        assert_eq!(
            snapshot.get("kingdom"),
            Some(&block(&[("village", "9"), ("smithy", "10"), ("moat", "10")]))
        );
    }

    #[test]
    fn preliminary_accessors() {
        let snapshot = GameStateSnapshot::from([(
            BlockKind::Preliminary,
            block(&[("player", "alice"), ("number of coins", "5"), ("phase", "buy")]),
        )]);

        assert_eq!(snapshot.preliminary("player"), Some("alice"));
        assert_eq!(snapshot.preliminary_number("number of coins"), Some(5));
        assert_eq!(snapshot.preliminary_number("player"), None);
        assert_eq!(snapshot.phase(), Some("buy"));
        assert_eq!(snapshot.get("trash"), None);
        assert_eq!(snapshot.get("no-such-block"), None);
    }

    #[test]
    fn policy_names_parse_back() {
        for policy in DuplicateBlockPolicy::ALL {
            assert_eq!(policy.name().parse(), Ok(policy));
        }
        assert_eq!(
            "Merge".parse::<DuplicateBlockPolicy>(),
            Err("unknown duplicate-block policy `Merge`".to_string())
        );
    }

    #[test]
    fn serializes_as_nested_name_map() {
        let snapshot = GameStateSnapshot::from([
            (BlockKind::Kingdom, block(&[("village", "10")])),
            (BlockKind::Trash, Block::new()),
        ]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"kingdom":{"village":"10"},"trash":{}}"#);
    }
}
