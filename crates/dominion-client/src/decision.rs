//! Move selection.
//!
//! The adapter does not play Dominion; it asks a [`MovePolicy`] for a
//! token each turn and sends whatever comes back.

use dominion_core::{GameStateSnapshot, MoveToken};

pub trait MovePolicy {
    fn choose(&mut self, snapshot: &GameStateSnapshot) -> MoveToken;
}

/// Always answers with the same move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedMove(MoveToken);

impl FixedMove {
    pub fn new(mv: impl Into<MoveToken>) -> Self {
        FixedMove(mv.into())
    }
}

impl MovePolicy for FixedMove {
    fn choose(&mut self, _snapshot: &GameStateSnapshot) -> MoveToken {
        self.0.clone()
    }
}

impl<F> MovePolicy for F
where
    F: FnMut(&GameStateSnapshot) -> MoveToken,
{
    fn choose(&mut self, snapshot: &GameStateSnapshot) -> MoveToken {
        self(snapshot)
    }
}
