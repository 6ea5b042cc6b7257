use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

use crate::{data::FieldPosition, pokedex::Health};

mod battle;
pub use battle::*;

mod owned;
pub use owned::*;

mod unknown;
pub use unknown::*;

pub mod stat;
pub mod status;

use stat::StatStages;
use status::{Status1, Status2};

/// One of the two teams in a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    pub const fn index(&self) -> usize {
        match self {
            Self::Home => 0,
            Self::Away => 1,
        }
    }

    pub const fn opposite(&self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        core::fmt::Debug::fmt(self, f)
    }
}

/// Identifies a creature for the whole battle: its team and its slot in the
/// team's roster, which never changes once the battle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct PokemonIndex {
    pub team: Side,
    pub index: u8,
}

impl PokemonIndex {
    pub const fn new(team: Side, index: u8) -> Self {
        Self { team, index }
    }
}

impl Display for PokemonIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} #{}", self.team, self.index)
    }
}

/// The state both the authority's creatures and a replica's mirrors expose.
pub trait PokemonView {
    fn id(&self) -> PokemonIndex;

    fn hp(&self) -> Health;

    fn max_hp(&self) -> Health;

    fn position(&self) -> FieldPosition;

    fn status1(&self) -> Status1;

    fn status2(&self) -> Status2;

    fn stages(&self) -> &StatStages;

    fn fainted(&self) -> bool {
        self.hp() == 0
    }

    fn on_field(&self) -> bool {
        !self.position().is_none()
    }

    /// Conscious and waiting on the bench.
    fn can_replace(&self) -> bool {
        !self.fainted() && !self.on_field()
    }
}

/// HP as a fraction of the maximum, in `[0, 1]`.
pub fn percent(hp: Health, max: Health) -> f32 {
    match max {
        0 => 0.0,
        max => hp as f32 / max as f32,
    }
}
