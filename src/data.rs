use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleData {
    #[serde(default)]
    pub format: BattleFormat,
    #[serde(default)]
    pub settings: BattleSettings,
}

impl BattleData {
    pub fn new(format: BattleFormat) -> Self {
        Self {
            format,
            settings: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleFormat {
    Single,
    Double,
    Triple,
    Rotation,
}

impl Default for BattleFormat {
    fn default() -> Self {
        Self::Single
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPosition {
    None,
    Left,
    Center,
    Right,
}

impl Default for FieldPosition {
    fn default() -> Self {
        Self::None
    }
}

impl FieldPosition {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Display for FieldPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

const SINGLE: &[FieldPosition] = &[FieldPosition::Center];
const DOUBLE: &[FieldPosition] = &[FieldPosition::Left, FieldPosition::Right];
const TRIPLE: &[FieldPosition] = &[
    FieldPosition::Left,
    FieldPosition::Center,
    FieldPosition::Right,
];
const ROTATION: &[FieldPosition] = &[
    FieldPosition::Center,
    FieldPosition::Left,
    FieldPosition::Right,
];

impl BattleFormat {
    /// Number of creatures each team keeps on the field.
    pub const fn slots(&self) -> usize {
        self.replacement_order().len()
    }

    /// Positions assigned to the leading party members when the battle begins.
    pub const fn starting_positions(&self) -> &'static [FieldPosition] {
        match self {
            Self::Single => SINGLE,
            Self::Double => DOUBLE,
            Self::Triple => TRIPLE,
            Self::Rotation => ROTATION,
        }
    }

    /// Order in which vacant positions are filled by replacements.
    pub const fn replacement_order(&self) -> &'static [FieldPosition] {
        match self {
            Self::Single => SINGLE,
            Self::Double => DOUBLE,
            Self::Triple | Self::Rotation => TRIPLE,
        }
    }

    pub fn is_legal(&self, position: FieldPosition) -> bool {
        self.replacement_order().contains(&position)
    }
}

impl Display for BattleFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        core::fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    None,
    HarshSunlight,
    Rain,
    Sandstorm,
    Hailstorm,
}

impl Default for Weather {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSettings {
    #[serde(default = "default_party_size")]
    pub max_party_size: u8,
    #[serde(default = "default_num_moves")]
    pub num_moves: u8,
    #[serde(default = "default_stat_change")]
    pub max_stat_change: i8,
    #[serde(default = "default_turns")]
    pub weather_turns: u8,
    #[serde(default = "default_turns")]
    pub screen_turns: u8,
    #[serde(default = "default_spikes")]
    pub max_spikes: u8,
    #[serde(default = "default_toxic_spikes")]
    pub max_toxic_spikes: u8,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            max_party_size: default_party_size(),
            num_moves: default_num_moves(),
            max_stat_change: default_stat_change(),
            weather_turns: default_turns(),
            screen_turns: default_turns(),
            max_spikes: default_spikes(),
            max_toxic_spikes: default_toxic_spikes(),
        }
    }
}

impl BattleSettings {
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        let bad = |field: &'static str| Err(InvalidArgument::Settings(field));
        if self.max_party_size == 0 {
            return bad("max_party_size");
        }
        if self.num_moves == 0 {
            return bad("num_moves");
        }
        if !(1..=6).contains(&self.max_stat_change) {
            return bad("max_stat_change");
        }
        if self.screen_turns == 0 {
            return bad("screen_turns");
        }
        if self.max_spikes == 0 || self.max_toxic_spikes == 0 {
            return bad("max_spikes");
        }
        Ok(())
    }
}

const fn default_party_size() -> u8 {
    6
}

const fn default_num_moves() -> u8 {
    4
}

const fn default_stat_change() -> i8 {
    6
}

const fn default_turns() -> u8 {
    5
}

const fn default_spikes() -> u8 {
    3
}

const fn default_toxic_spikes() -> u8 {
    2
}
