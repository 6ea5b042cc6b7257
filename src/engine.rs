//! The seam between the battle host and whatever knows what moves, items
//! and abilities actually do.

use std::error::Error;

use rand::Rng;

use crate::{
    data::Weather,
    event::{ItemAction, MoveResult, WeatherAction},
    field::Field,
    moves::{MoveData, MoveId},
    party::TeamStatus,
    pokedex::{Ability, Health, Item},
    pokemon::{
        stat::{BattleStat, Stage},
        status::{Status1, Status2, StatusAction},
        PokemonIndex, Side,
    },
    select::Target,
};

/// A single consequence reported by an effect engine. The host applies
/// outcomes in order, checks for fainting, and turns each into events.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Damage {
        target: PokemonIndex,
        amount: Health,
    },
    Heal {
        target: PokemonIndex,
        amount: Health,
    },
    Crit {
        victim: PokemonIndex,
    },
    Result {
        user: PokemonIndex,
        target: PokemonIndex,
        result: MoveResult,
    },
    /// `counter` replaces the status counter (sleep turns, toxic multiplier).
    Status1 {
        target: PokemonIndex,
        status: Status1,
        action: StatusAction,
        counter: u8,
    },
    Status2 {
        target: PokemonIndex,
        status: Status2,
        action: StatusAction,
    },
    StatChange {
        target: PokemonIndex,
        stat: BattleStat,
        change: Stage,
    },
    TeamStatus {
        team: Side,
        status: TeamStatus,
        action: StatusAction,
        victim: Option<PokemonIndex>,
    },
    /// `turns` is only read when weather is added; zero lasts indefinitely.
    Weather {
        weather: Weather,
        action: WeatherAction,
        turns: u8,
        victim: Option<PokemonIndex>,
    },
    Ability {
        pokemon: PokemonIndex,
        ability: Ability,
    },
    Item {
        pokemon: PokemonIndex,
        item: Item,
        action: ItemAction,
    },
}

impl Outcome {
    /// The creature the outcome lands on, if it has to be conscious for the
    /// outcome to matter.
    pub fn subject(&self) -> Option<PokemonIndex> {
        match self {
            Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::Status1 { target, .. }
            | Self::Status2 { target, .. }
            | Self::StatChange { target, .. } => Some(*target),
            Self::Crit { victim } => Some(*victim),
            Self::Ability { pokemon, .. } | Self::Item { pokemon, .. } => Some(*pokemon),
            _ => None,
        }
    }
}

/// Result of the checks run before a creature uses its move.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PreMove {
    pub outcomes: Vec<Outcome>,
    /// `false` if the creature loses its turn.
    pub proceed: bool,
}

impl PreMove {
    pub fn proceed(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            proceed: true,
        }
    }

    pub fn prevented(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            proceed: false,
        }
    }
}

pub trait BattleEngine {
    type ExecutionError: Error + Send + Sync + 'static;

    fn get_move(&self, id: &MoveId) -> Option<&MoveData>;

    /// Status checks that may stop `user` from moving this turn.
    fn before_move(
        &self,
        random: &mut impl Rng,
        field: &Field,
        user: PokemonIndex,
    ) -> Result<PreMove, Self::ExecutionError>;

    /// Resolves targets, accuracy, damage and side effects of a move.
    fn execute(
        &self,
        random: &mut impl Rng,
        field: &Field,
        user: PokemonIndex,
        move_id: &MoveId,
        target: Option<Target>,
    ) -> Result<Vec<Outcome>, Self::ExecutionError>;

    /// Entry hazards and entry abilities for a creature that just arrived.
    fn switch_in(
        &self,
        random: &mut impl Rng,
        field: &Field,
        pokemon: PokemonIndex,
    ) -> Result<Vec<Outcome>, Self::ExecutionError>;

    /// End-of-turn effects for one conscious active creature.
    fn turn_end(
        &self,
        random: &mut impl Rng,
        field: &Field,
        pokemon: PokemonIndex,
    ) -> Result<Vec<Outcome>, Self::ExecutionError>;
}
