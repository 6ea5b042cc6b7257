//! Move identifiers and the fixed per-move data the turn-order resolver needs.

use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

use crate::pokedex::PP;

pub type Priority = i8;
pub type Power = u8;
pub type Accuracy = u8;

pub const MAX_PRIORITY: Priority = 5;
pub const MIN_PRIORITY: Priority = -7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveId {
    Tackle,
    QuickAttack,
    ExtremeSpeed,
    FakeOut,
    HelpingHand,
    Protect,
    Detect,
    Endure,
    VitalThrow,
    Whirlwind,
    TrickRoom,
    Thunderbolt,
    Flamethrower,
    IceBeam,
    Surf,
    Earthquake,
    BodySlam,
    Headbutt,
    DragonRage,
    SonicBoom,
    ThunderWave,
    Toxic,
    WillOWisp,
    Hypnosis,
    ConfuseRay,
    SwordsDance,
    Agility,
    Growl,
    Recover,
    Substitute,
    Reflect,
    LightScreen,
    Spikes,
    ToxicSpikes,
    RainDance,
    SunnyDay,
    Sandstorm,
    Hail,
}

impl Display for MoveId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WillOWisp => f.write_str("Will-O-Wisp"),
            other => crate::pokedex::spaced(&format!("{:?}", other), f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Which creatures a move may affect, relative to its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveTarget {
    /// One chosen opponent.
    Opponent,
    AllOpponents,
    /// Everyone else on the field.
    AllOthers,
    User,
    /// One chosen ally.
    Ally,
    /// The user's team as a whole.
    UserTeam,
    /// The opposing team as a whole.
    OpponentTeam,
    /// The whole field.
    All,
}

impl MoveTarget {
    /// Whether the move needs a position chosen with the action.
    pub const fn needs_target(&self) -> bool {
        matches!(self, Self::Opponent | Self::Ally)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MoveFlags: u8 {
        const CONTACT = 1 << 0;
        const PROTECTION = 1 << 1;
        const BLOCKED_BY_PROTECT = 1 << 2;
        const HIGH_CRIT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub priority: Priority,
    pub pp: PP,
    pub category: MoveCategory,
    pub target: MoveTarget,
    pub power: Option<Power>,
    /// `None` never misses.
    pub accuracy: Option<Accuracy>,
    #[serde(default)]
    pub flags: MoveFlags,
}

impl MoveData {
    pub fn is_protection(&self) -> bool {
        self.flags.contains(MoveFlags::PROTECTION)
    }
}
