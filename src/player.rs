//! Roster input: what a trainer brings into a battle.

use serde::{Deserialize, Serialize};

use crate::{
    moves::MoveId,
    pokedex::{Ability, Item, Level, SpeciesId, Stats},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamShell {
    pub name: String,
    pub party: Vec<PokemonShell>,
}

impl TeamShell {
    pub fn new(name: impl Into<String>, party: Vec<PokemonShell>) -> Self {
        Self {
            name: name.into(),
            party,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonShell {
    pub species: SpeciesId,
    pub nickname: String,
    pub level: Level,
    pub stats: Stats,
    #[serde(default)]
    pub ability: Option<Ability>,
    #[serde(default)]
    pub item: Option<Item>,
    pub moves: Vec<MoveId>,
}

impl PokemonShell {
    pub fn new(species: SpeciesId, nickname: impl Into<String>, level: Level, stats: Stats) -> Self {
        Self {
            species,
            nickname: nickname.into(),
            level,
            stats,
            ability: None,
            item: None,
            moves: Vec::new(),
        }
    }

    pub fn with_moves(mut self, moves: impl IntoIterator<Item = MoveId>) -> Self {
        self.moves = moves.into_iter().collect();
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }
}
