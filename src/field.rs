use crate::{
    data::{BattleData, FieldPosition, Weather},
    error::InvalidArgument,
    party::PlayerParty,
    pokemon::{BattlePokemon, PokemonIndex, Side},
    snapshot::BattleSnapshot,
};

/// Everything on the battlefield, as the authority sees it. Effect engines
/// read this; only the battle host writes it.
#[derive(Debug, Clone)]
pub struct Field {
    pub data: BattleData,
    pub teams: [PlayerParty<BattlePokemon>; 2],
    /// Creatures on the field, in the order they arrived.
    pub active_battlers: Vec<PokemonIndex>,
    pub weather: Weather,
    /// Turns of weather left; zero lasts until replaced.
    pub weather_counter: u8,
}

impl Field {
    pub fn team(&self, side: Side) -> &PlayerParty<BattlePokemon> {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut PlayerParty<BattlePokemon> {
        &mut self.teams[side.index()]
    }

    pub fn get(&self, id: PokemonIndex) -> Option<&BattlePokemon> {
        self.team(id.team).get(id.index)
    }

    pub fn get_mut(&mut self, id: PokemonIndex) -> Option<&mut BattlePokemon> {
        self.team_mut(id.team).get_mut(id.index)
    }

    pub fn pokemon(&self, id: PokemonIndex) -> Result<&BattlePokemon, InvalidArgument> {
        self.get(id).ok_or(InvalidArgument::UnknownPokemon(id))
    }

    pub fn pokemon_mut(&mut self, id: PokemonIndex) -> Result<&mut BattlePokemon, InvalidArgument> {
        self.get_mut(id).ok_or(InvalidArgument::UnknownPokemon(id))
    }

    pub fn at(&self, side: Side, position: FieldPosition) -> Option<&BattlePokemon> {
        self.team(side).at(position)
    }

    /// Active creatures in arrival order.
    pub fn active(&self) -> impl Iterator<Item = &BattlePokemon> + '_ {
        self.active_battlers.iter().flat_map(move |id| self.get(*id))
    }

    pub fn active_on(&self, side: Side) -> impl Iterator<Item = &BattlePokemon> + '_ {
        self.active().filter(move |p| p.id.team == side)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            weather: self.weather,
            teams: [(&self.teams[0]).into(), (&self.teams[1]).into()],
        }
    }
}
