use serde::{Deserialize, Serialize};

use crate::{
    data::FieldPosition,
    moves::MoveId,
    pokemon::{PokemonIndex, Side},
};

/// A field position chosen as the target of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub team: Side,
    pub position: FieldPosition,
}

impl Target {
    pub const fn new(team: Side, position: FieldPosition) -> Self {
        Self { team, position }
    }
}

/// What an active creature does this turn. A creature with no action holds
/// `None` in its selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    Fight {
        move_id: MoveId,
        #[serde(default)]
        target: Option<Target>,
    },
    /// Withdraw in favour of the given party member.
    Switch(PokemonIndex),
}

impl TurnAction {
    pub const fn fight(move_id: MoveId) -> Self {
        Self::Fight {
            move_id,
            target: None,
        }
    }

    pub const fn fight_at(move_id: MoveId, target: Target) -> Self {
        Self::Fight {
            move_id,
            target: Some(target),
        }
    }

    pub fn move_id(&self) -> Option<&MoveId> {
        match self {
            Self::Fight { move_id, .. } => Some(move_id),
            Self::Switch(..) => None,
        }
    }
}

/// A replacement sent to fill a vacant position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchIn {
    pub pokemon: PokemonIndex,
    pub position: FieldPosition,
}

impl SwitchIn {
    pub const fn new(pokemon: PokemonIndex, position: FieldPosition) -> Self {
        Self { pokemon, position }
    }
}
