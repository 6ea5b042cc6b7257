use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Deref, DerefMut},
};
use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use crate::pokedex::{BaseStat, Stats};

pub type Stage = i8;

#[derive(Debug, Clone, Copy, Enum, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStat {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl BattleStat {
    /// The stat block value this stage scales, if any.
    pub fn of(&self, stats: &Stats) -> Option<BaseStat> {
        match self {
            Self::Attack => Some(stats.attack),
            Self::Defense => Some(stats.defense),
            Self::SpAttack => Some(stats.sp_attack),
            Self::SpDefense => Some(stats.sp_defense),
            Self::Speed => Some(stats.speed),
            Self::Accuracy | Self::Evasion => None,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages(EnumMap<BattleStat, Stage>);

impl StatStages {
    /// Whether a change of `stage` would move the stat at all.
    pub fn can_change(&self, stat: BattleStat, stage: Stage, max: Stage) -> bool {
        let current = self[stat];
        (stage > 0 && current < max) || (stage < 0 && current > -max)
    }

    /// Applies a change, clamped to `[-max, max]`, and returns the new stage.
    pub fn change_stage(&mut self, stat: BattleStat, stage: Stage, max: Stage) -> Stage {
        let new = self[stat].saturating_add(stage).clamp(-max, max);
        self[stat] = new;
        new
    }

    pub fn reset(&mut self) {
        self.0 = Default::default();
    }

    /// Multiplier for the five regular stats.
    pub fn multiplier(stage: Stage) -> f64 {
        2.0f64.max(2.0 + stage as f64) / 2.0f64.max(2.0 - stage as f64)
    }

    /// Multiplier for accuracy and evasion.
    pub fn accuracy_multiplier(stage: Stage) -> f64 {
        3.0f64.max(3.0 + stage as f64) / 3.0f64.max(3.0 - stage as f64)
    }

    pub fn mult(base: BaseStat, stage: Stage) -> BaseStat {
        base * (2.max(2 + stage) as BaseStat) / (2.max(2 - stage) as BaseStat)
    }
}

impl Deref for StatStages {
    type Target = EnumMap<BattleStat, Stage>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StatStages {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for BattleStat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Attack => "Attack",
            Self::Defense => "Defense",
            Self::SpAttack => "Sp. Atk",
            Self::SpDefense => "Sp. Def",
            Self::Speed => "Speed",
            Self::Accuracy => "Accuracy",
            Self::Evasion => "Evasion",
        })
    }
}
