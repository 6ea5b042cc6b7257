use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// Primary status. At most one at a time; survives switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status1 {
    None,
    Asleep,
    Frozen,
    Paralyzed,
    Poisoned,
    BadlyPoisoned,
    Burned,
}

impl Default for Status1 {
    fn default() -> Self {
        Self::None
    }
}

impl Status1 {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Display for Status1 {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::None => "none",
            Self::Asleep => "asleep",
            Self::Frozen => "frozen",
            Self::Paralyzed => "paralyzed",
            Self::Poisoned => "poisoned",
            Self::BadlyPoisoned => "badly poisoned",
            Self::Burned => "burned",
        })
    }
}

bitflags::bitflags! {
    /// Volatile statuses, cleared when the creature leaves the field.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Status2: u16 {
        const CONFUSED = 1 << 0;
        const FLINCHING = 1 << 1;
        const PROTECTED = 1 << 2;
        const SUBSTITUTE = 1 << 3;
        const HELPING_HAND = 1 << 4;
        const ENDURING = 1 << 5;
    }
}

impl Status2 {
    /// Statuses that only last until the end of the turn.
    pub const TURN: Self = Self::FLINCHING
        .union(Self::PROTECTED)
        .union(Self::HELPING_HAND)
        .union(Self::ENDURING);
}

/// What happened to a status, shared by primary, volatile and team statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusAction {
    Added,
    /// Already present; the attempt is announced.
    Announced,
    CausedImmobility,
    /// Removed by an outside effect.
    Cleared,
    Damage,
    /// Ran its course.
    Ended,
}

impl StatusAction {
    pub const fn removes(&self) -> bool {
        matches!(self, Self::Cleared | Self::Ended)
    }
}
