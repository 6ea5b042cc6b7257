//! Comparable views of battle state, built the same way from the authority
//! and from a replica.

use serde::{Deserialize, Serialize};

use crate::{
    data::{FieldPosition, Weather},
    party::{PlayerParty, TeamStatus},
    pokedex::Health,
    pokemon::{
        stat::StatStages,
        status::{Status1, Status2},
        PokemonIndex, PokemonView,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub weather: Weather,
    pub teams: [TeamSnapshot; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub status: TeamStatus,
    pub spikes: u8,
    pub toxic_spikes: u8,
    pub pokemon: Vec<PokemonSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSnapshot {
    pub id: PokemonIndex,
    pub position: FieldPosition,
    pub hp: Health,
    pub max_hp: Health,
    pub status1: Status1,
    pub status2: Status2,
    pub stages: StatStages,
}

impl<P: PokemonView> From<&P> for PokemonSnapshot {
    fn from(pokemon: &P) -> Self {
        Self {
            id: pokemon.id(),
            position: pokemon.position(),
            hp: pokemon.hp(),
            max_hp: pokemon.max_hp(),
            status1: pokemon.status1(),
            status2: pokemon.status2(),
            stages: pokemon.stages().clone(),
        }
    }
}

impl<P: PokemonView> From<&PlayerParty<P>> for TeamSnapshot {
    fn from(party: &PlayerParty<P>) -> Self {
        Self {
            status: party.status,
            spikes: party.spike_count,
            toxic_spikes: party.toxic_spike_count,
            pokemon: party.pokemon.iter().map(Into::into).collect(),
        }
    }
}
