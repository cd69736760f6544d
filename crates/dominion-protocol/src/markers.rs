//! Protocol literals.
//!
//! A turn is a run of marked blocks ending in `response?`:
//!
//! ```text
//! @PRELIMINARY@
//! *player: alice*
//! *number of coins: 3*
//! @PLAYER-HAND@
//! *copper, 3*
//! *estate, 2*
//! @KINGDOM@
//! *village, 10*
//! response?
//! ```
//!
//! Every line starting with `@` closes the current block. Only the six
//! markers below open one; `response?` ends the turn.
//!
//! The stock engine prints entries without the closing `*` (e.g.
//! `*number of coins: 3`, `*hand-card 1: copper, 3`). Those still parse,
//! but the value comes out empty and card keys keep their `hand-card N: `
//! prefix.

use dominion_core::BlockKind;

/// Line the engine prints when it is waiting for a move.
pub const SENTINEL: &str = "response?";

/// First character of every section marker.
pub const MARKER_PREFIX: char = '@';

/// Opens (and closes) the key/value part of a block line.
pub const ENTRY_DELIMITER: char = '*';

/// Section marker literal → block it opens.
pub const SECTION_MARKERS: [(&str, BlockKind); 6] = [
    ("@PRELIMINARY@", BlockKind::Preliminary),
    ("@PLAYER-DECK@", BlockKind::PlayerDeck),
    ("@PLAYER-HAND@", BlockKind::PlayerHand),
    ("@PLAYER-DISCARD@", BlockKind::PlayerDiscard),
    ("@KINGDOM@", BlockKind::Kingdom),
    ("@TRASH@", BlockKind::Trash),
];

/// Block opened by `line`, if it is exactly one of the section markers.
pub fn block_for_marker(line: &str) -> Option<BlockKind> {
    if !line.starts_with(MARKER_PREFIX) {
        return None;
    }
    SECTION_MARKERS
        .iter()
        .find(|(marker, _)| *marker == line)
        .map(|(_, kind)| *kind)
}

/// Marker literal that opens `kind`.
pub fn marker_for(kind: BlockKind) -> &'static str {
    SECTION_MARKERS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(marker, _)| *marker)
        .unwrap_or_default()
}

/// True when `line` ends the block currently being read.
pub fn ends_block(line: &str) -> bool {
    line.starts_with(MARKER_PREFIX) || line == SENTINEL
}
