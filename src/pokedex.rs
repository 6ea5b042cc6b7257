//! Species, item and ability identifiers plus the derived stat block a
//! creature enters battle with.

use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

pub type Level = u8;
pub type Health = u16;
pub type BaseStat = u16;
pub type PP = u8;

/// National dex number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

impl SpeciesId {
    pub const DITTO: Self = Self(132);
}

impl Display for SpeciesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{:03}", self.0)
    }
}

/// Stats after level, nature and training have been applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: Health,
    pub attack: BaseStat,
    pub defense: BaseStat,
    pub sp_attack: BaseStat,
    pub sp_defense: BaseStat,
    pub speed: BaseStat,
}

impl Stats {
    pub const fn new(
        hp: Health,
        attack: BaseStat,
        defense: BaseStat,
        sp_attack: BaseStat,
        sp_defense: BaseStat,
        speed: BaseStat,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    ChoiceScarf,
    MachoBrace,
    PowerAnklet,
    PowerBand,
    PowerBelt,
    PowerBracer,
    PowerLens,
    PowerWeight,
    QuickPowder,
    Leftovers,
}

impl Item {
    /// Halves speed while held.
    pub const fn is_power_item(&self) -> bool {
        matches!(
            self,
            Self::MachoBrace
                | Self::PowerAnklet
                | Self::PowerBand
                | Self::PowerBelt
                | Self::PowerBracer
                | Self::PowerLens
                | Self::PowerWeight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Chlorophyll,
    SwiftSwim,
    SandRush,
    SandVeil,
    Drizzle,
    Drought,
    SandStream,
    SnowWarning,
    RainDish,
    IceBody,
    SpeedBoost,
    Insomnia,
    Limber,
    Immunity,
    MagicGuard,
    Overcoat,
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        spaced(&format!("{:?}", self), f)
    }
}

impl Display for Ability {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        spaced(&format!("{:?}", self), f)
    }
}

/// Writes a CamelCase identifier as separate words.
pub(crate) fn spaced(name: &str, f: &mut Formatter<'_>) -> FmtResult {
    for (i, c) in name.chars().enumerate() {
        if i != 0 && c.is_uppercase() {
            f.write_str(" ")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}
