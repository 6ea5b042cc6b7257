use serde::{Deserialize, Serialize};

use crate::{
    data::FieldPosition,
    pokedex::{Ability, Health, Item, Level, SpeciesId},
};

use super::{
    stat::StatStages,
    status::{Status1, Status2},
    Moveset, PokemonIndex, PokemonView,
};

/// A replica's mirror of a creature. Fields the observer has not been shown
/// stay `None` (or zero for exact HP, which hidden observers only know as a
/// percentage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownPokemon {
    pub id: PokemonIndex,
    pub species: Option<SpeciesId>,
    pub nickname: Option<String>,
    pub level: Option<Level>,
    pub hp: Health,
    pub max_hp: Health,
    pub percent: f32,
    pub status1: Status1,
    pub status2: Status2,
    pub stages: StatStages,
    pub position: FieldPosition,
    pub item: Option<Item>,
    pub ability: Option<Ability>,
    pub moves: Moveset,
}

impl UnknownPokemon {
    /// A party member the observer knows exists but has never seen.
    pub fn placeholder(id: PokemonIndex) -> Self {
        Self {
            id,
            species: None,
            nickname: None,
            level: None,
            hp: 0,
            max_hp: 0,
            percent: 1.0,
            status1: Status1::None,
            status2: Status2::empty(),
            stages: Default::default(),
            position: FieldPosition::None,
            item: None,
            ability: None,
            moves: Default::default(),
        }
    }

    pub fn known(&self) -> bool {
        self.species.is_some()
    }

    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or("???")
    }

    pub fn clear_for_switch(&mut self) {
        self.position = FieldPosition::None;
        self.stages.reset();
        self.status2 = Status2::empty();
    }
}

impl PokemonView for UnknownPokemon {
    fn id(&self) -> PokemonIndex {
        self.id
    }

    fn hp(&self) -> Health {
        self.hp
    }

    fn max_hp(&self) -> Health {
        self.max_hp
    }

    fn position(&self) -> FieldPosition {
        self.position
    }

    fn status1(&self) -> Status1 {
        self.status1
    }

    fn status2(&self) -> Status2 {
        self.status2
    }

    fn stages(&self) -> &StatStages {
        &self.stages
    }

    fn fainted(&self) -> bool {
        self.percent <= 0.0
    }
}
