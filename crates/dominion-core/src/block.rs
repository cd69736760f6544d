//! Named blocks of game state and their key/value entries.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// The six blocks the engine emits each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// Turn-level counters: player, actions, buys, coins, scores, phase.
    Preliminary,
    PlayerDeck,
    PlayerHand,
    PlayerDiscard,
    Kingdom,
    Trash,
}

/// Delimiter grammar used to split one block line into an entry.
///
/// Both grammars take the key from the first `*` up to the key delimiter
/// and the value from the value delimiter up to the next `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryGrammar {
    /// `*key: value*`
    Preliminary,
    /// `*card, count*`
    CardCount,
}

impl EntryGrammar {
    /// Character that ends the key.
    pub fn key_delimiter(self) -> char {
        match self {
            EntryGrammar::Preliminary => ':',
            EntryGrammar::CardCount => ',',
        }
    }

    /// Text that starts the value.
    pub fn value_delimiter(self) -> &'static str {
        match self {
            EntryGrammar::Preliminary => ": ",
            EntryGrammar::CardCount => ", ",
        }
    }
}

impl BlockKind {
    /// All block kinds, in the order the engine emits them.
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Preliminary,
        BlockKind::PlayerDeck,
        BlockKind::PlayerHand,
        BlockKind::PlayerDiscard,
        BlockKind::Kingdom,
        BlockKind::Trash,
    ];

    /// Snapshot-level name, e.g. `"player-hand"`.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Preliminary => "preliminary",
            BlockKind::PlayerDeck => "player-deck",
            BlockKind::PlayerHand => "player-hand",
            BlockKind::PlayerDiscard => "player-discard",
            BlockKind::Kingdom => "kingdom",
            BlockKind::Trash => "trash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BlockKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn grammar(self) -> EntryGrammar {
        match self {
            BlockKind::Preliminary => EntryGrammar::Preliminary,
            _ => EntryGrammar::CardCount,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entries of one block, keyed by entry key.
///
/// Keeps the order in which the engine emitted the entries, but two blocks
/// compare equal whenever they hold the same pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Block {
    entries: IndexMap<String, String>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Card count for `card`, if present and numeric.
    pub fn count(&self, card: &str) -> Option<u32> {
        self.get(card)?.trim().parse().ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert an entry; returns the value it replaced, if any.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    /// Merge `other` into `self`; keys from `other` win.
    pub(crate) fn merge(&mut self, other: Block) {
        self.entries.extend(other.entries);
    }
}

impl<K, V> FromIterator<(K, V)> for Block
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Block {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
