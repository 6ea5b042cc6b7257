//! The event log. Every change to battle state the authority makes is
//! recorded as one of these, carrying the values after the change so a
//! replica can apply it without knowing any battle rules.

use serde::{Deserialize, Serialize};

use crate::{
    data::{FieldPosition, Weather},
    moves::MoveId,
    party::TeamStatus,
    pokedex::{Ability, Health, Item, Level, SpeciesId, PP},
    pokemon::{
        stat::{BattleStat, Stage},
        status::{Status1, Status2, StatusAction},
        Moveset, PokemonIndex, Side,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherAction {
    Added,
    CausedDamage,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemAction {
    RestoredHp,
    CausedDamage,
    Announced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveResult {
    Missed,
    NoTarget,
    /// The move did nothing: the target already has the status, is at its
    /// stat limit, or the conditions for it were not met.
    Failed,
    IneffectiveAbility,
    IneffectiveStatus,
    IneffectiveSubstitute,
}

/// Everything about a party member its owner knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInfo {
    pub id: PokemonIndex,
    pub species: SpeciesId,
    pub nickname: String,
    pub level: Level,
    pub hp: Health,
    pub max_hp: Health,
    pub status1: Status1,
    pub ability: Option<Ability>,
    pub item: Option<Item>,
    pub moves: Moveset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchInInfo {
    pub id: PokemonIndex,
    pub species: SpeciesId,
    pub nickname: String,
    pub level: Level,
    pub hp: Health,
    pub max_hp: Health,
    pub status1: Status1,
    pub position: FieldPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenSwitchInInfo {
    pub id: PokemonIndex,
    pub species: SpeciesId,
    pub nickname: String,
    pub level: Level,
    pub percent: f32,
    pub status1: Status1,
    pub position: FieldPosition,
}

impl From<&SwitchInInfo> for HiddenSwitchInInfo {
    fn from(info: &SwitchInInfo) -> Self {
        Self {
            id: info.id,
            species: info.species,
            nickname: info.nickname.clone(),
            level: info.level,
            percent: crate::pokemon::percent(info.hp, info.max_hp),
            status1: info.status1,
            position: info.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    Party {
        team: Side,
        name: String,
        party: Vec<PokemonInfo>,
    },
    /// Only the size of a party, for observers that may not see it.
    PartyHidden {
        team: Side,
        name: String,
        size: u8,
    },
    SwitchIn {
        team: Side,
        switch_ins: Vec<SwitchInInfo>,
        forced: bool,
    },
    SwitchInHidden {
        team: Side,
        switch_ins: Vec<HiddenSwitchInInfo>,
        forced: bool,
    },
    SwitchOut {
        pokemon: PokemonIndex,
        old_position: FieldPosition,
        forced: bool,
    },
    SwitchOutHidden {
        team: Side,
        old_position: FieldPosition,
        forced: bool,
    },
    HpChanged {
        pokemon: PokemonIndex,
        old_hp: Health,
        new_hp: Health,
        old_percent: f32,
        new_percent: f32,
    },
    HpChangedHidden {
        pokemon: PokemonIndex,
        old_percent: f32,
        new_percent: f32,
    },
    Fainted {
        pokemon: PokemonIndex,
        old_position: FieldPosition,
    },
    FaintedHidden {
        team: Side,
        old_position: FieldPosition,
    },
    MoveUsed {
        user: PokemonIndex,
        move_id: MoveId,
    },
    MoveResult {
        user: PokemonIndex,
        target: PokemonIndex,
        result: MoveResult,
    },
    MoveCrit {
        victim: PokemonIndex,
    },
    PpChanged {
        pokemon: PokemonIndex,
        move_id: MoveId,
        old: PP,
        new: PP,
    },
    StatChanged {
        pokemon: PokemonIndex,
        stat: BattleStat,
        old: Stage,
        new: Stage,
    },
    Status1 {
        pokemon: PokemonIndex,
        status: Status1,
        action: StatusAction,
    },
    Status2 {
        pokemon: PokemonIndex,
        status: Status2,
        action: StatusAction,
    },
    TeamStatus {
        team: Side,
        status: TeamStatus,
        action: StatusAction,
        victim: Option<PokemonIndex>,
        layers: u8,
    },
    Weather {
        weather: Weather,
        action: WeatherAction,
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
    TurnBegan {
        turn: u16,
    },
    ActionsRequest {
        team: Side,
        pokemon: Vec<PokemonIndex>,
    },
    SwitchInRequest {
        team: Side,
        amount: u8,
    },
    /// `None` is a draw.
    Winner {
        team: Option<Side>,
    },
}

/// Who an observer is, which decides what it may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perspective {
    Team(Side),
    Spectator { hide_non_owned: bool },
}

impl Perspective {
    /// Whether private details of `team`'s creatures are visible.
    pub fn sees(&self, team: Side) -> bool {
        match self {
            Self::Team(side) => *side == team,
            Self::Spectator { hide_non_owned } => !hide_non_owned,
        }
    }
}

impl BattleEvent {
    /// The team whose private details the event carries, if any.
    pub fn owner(&self) -> Option<Side> {
        match self {
            Self::Party { team, .. } | Self::SwitchIn { team, .. } => Some(*team),
            Self::SwitchOut { pokemon, .. }
            | Self::HpChanged { pokemon, .. }
            | Self::Fainted { pokemon, .. }
            | Self::PpChanged { pokemon, .. } => Some(pokemon.team),
            _ => None,
        }
    }

    /// The form of this event an outsider receives. `None` means outsiders
    /// learn nothing from it.
    pub fn hidden(&self) -> Option<BattleEvent> {
        Some(match self {
            Self::Party { team, name, party } => Self::PartyHidden {
                team: *team,
                name: name.clone(),
                size: party.len() as u8,
            },
            Self::SwitchIn {
                team,
                switch_ins,
                forced,
            } => Self::SwitchInHidden {
                team: *team,
                switch_ins: switch_ins.iter().map(Into::into).collect(),
                forced: *forced,
            },
            Self::SwitchOut {
                pokemon,
                old_position,
                forced,
            } => Self::SwitchOutHidden {
                team: pokemon.team,
                old_position: *old_position,
                forced: *forced,
            },
            Self::HpChanged {
                pokemon,
                old_percent,
                new_percent,
                ..
            } => Self::HpChangedHidden {
                pokemon: *pokemon,
                old_percent: *old_percent,
                new_percent: *new_percent,
            },
            Self::Fainted {
                pokemon,
                old_position,
            } => Self::FaintedHidden {
                team: pokemon.team,
                old_position: *old_position,
            },
            Self::PpChanged { .. } => return None,
            other => other.clone(),
        })
    }

    pub fn for_perspective(&self, perspective: Perspective) -> Option<BattleEvent> {
        match self.owner() {
            Some(owner) if !perspective.sees(owner) => self.hidden(),
            _ => Some(self.clone()),
        }
    }
}
