//! dominion-core
//!
//! Pure game-state model for the Dominion engine adapter:
//! - lines (one unit of engine output)
//! - block kinds and their entries
//! - the immutable per-turn snapshot
//! - move tokens sent back to the engine

pub mod line;
pub mod block;
pub mod snapshot;
pub mod move_token;

pub use line::Line;
pub use block::{Block, BlockKind, EntryGrammar};
pub use snapshot::{BlockInsert, DuplicateBlockPolicy, GameStateSnapshot, SnapshotBuilder};
pub use move_token::MoveToken;
