use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

use crate::{
    data::{BattleFormat, FieldPosition},
    moves::MoveId,
    pokemon::{PokemonIndex, Side},
    state::BattleState,
};

#[derive(Debug)]
pub enum BattleError {
    /// An entry point was called out of turn.
    Protocol(ProtocolError),
    InvalidArgument(InvalidArgument),
    /// The battle reached a state it has no rule for.
    Unreachable(String),
    /// The effect engine failed.
    Execution(Box<dyn Error + Send + Sync + 'static>),
}

impl BattleError {
    pub(crate) fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    pub(crate) fn execution(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Execution(Box::new(err))
    }
}

impl Error for BattleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Protocol(err) => Some(err),
            Self::InvalidArgument(err) => Some(err),
            Self::Unreachable(..) => None,
            Self::Execution(err) => Some(err.as_ref()),
        }
    }
}

impl Display for BattleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Protocol(err) => write!(f, "protocol violation: {}", err),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {}", err),
            Self::Unreachable(message) => write!(f, "unreachable battle state: {}", message),
            Self::Execution(err) => write!(f, "effect execution failed: {}", err),
        }
    }
}

impl From<ProtocolError> for BattleError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

impl From<InvalidArgument> for BattleError {
    fn from(err: InvalidArgument) -> Self {
        Self::InvalidArgument(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    WrongState {
        expected: BattleState,
        actual: BattleState,
    },
    /// The creature is not waiting on an action, or already chose one.
    ActionNotRequired(PokemonIndex),
    NoSwitchInsRequired(Side),
    TooManySwitchIns(Side),
    TeamAlreadySet(Side),
}

impl Error for ProtocolError {}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WrongState { expected, actual } => {
                write!(f, "battle is {}, expected {}", actual, expected)
            }
            Self::ActionNotRequired(id) => write!(f, "{} is not waiting on an action", id),
            Self::NoSwitchInsRequired(side) => write!(f, "{} has no switch-ins to make", side),
            Self::TooManySwitchIns(side) => write!(f, "{} sent more switch-ins than required", side),
            Self::TeamAlreadySet(side) => write!(f, "{} already has a team", side),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    Settings(&'static str),
    PartySize(Side, usize),
    Roster(PokemonIndex, &'static str),
    UnknownPokemon(PokemonIndex),
    UnknownMove(MoveId),
    MoveNotKnown(PokemonIndex, MoveId),
    NoPP(PokemonIndex, MoveId),
    IllegalPosition(FieldPosition, BattleFormat),
    PositionTaken(Side, FieldPosition),
    /// The creature cannot be sent out: fainted, already out, already
    /// chosen, or on the other team.
    CannotSwitchIn(PokemonIndex),
}

impl Error for InvalidArgument {}

impl Display for InvalidArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Settings(field) => write!(f, "setting {} is out of range", field),
            Self::PartySize(side, size) => write!(f, "{} brought {} pokemon", side, size),
            Self::Roster(id, reason) => write!(f, "{}: {}", id, reason),
            Self::UnknownPokemon(id) => write!(f, "no pokemon {}", id),
            Self::UnknownMove(id) => write!(f, "no move data for {}", id),
            Self::MoveNotKnown(id, m) => write!(f, "{} does not know {}", id, m),
            Self::NoPP(id, m) => write!(f, "{} has no PP left for {}", id, m),
            Self::IllegalPosition(position, format) => {
                write!(f, "{} is not a position in a {} battle", position, format)
            }
            Self::PositionTaken(side, position) => {
                write!(f, "{} {} is already occupied", side, position)
            }
            Self::CannotSwitchIn(id) => write!(f, "{} cannot be switched in", id),
        }
    }
}
