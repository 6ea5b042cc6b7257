use serde::{Deserialize, Serialize};

use crate::{moves::MoveId, pokedex::PP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedMove {
    pub id: MoveId,
    pub pp: PP,
    pub max_pp: PP,
}

impl OwnedMove {
    pub fn new(id: MoveId, max_pp: PP) -> Self {
        Self {
            id,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pp == 0
    }

    /// Spends one PP and returns the remaining amount.
    pub fn decrement(&mut self) -> PP {
        self.pp = self.pp.saturating_sub(1);
        self.pp
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Moveset(Vec<OwnedMove>);

impl Moveset {
    pub fn new(moves: Vec<OwnedMove>) -> Self {
        Self(moves)
    }

    pub fn get(&self, id: &MoveId) -> Option<&OwnedMove> {
        self.0.iter().find(|m| &m.id == id)
    }

    pub fn get_mut(&mut self, id: &MoveId) -> Option<&mut OwnedMove> {
        self.0.iter_mut().find(|m| &m.id == id)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, OwnedMove> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
