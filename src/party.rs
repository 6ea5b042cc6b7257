use serde::{Deserialize, Serialize};

use crate::{
    data::{BattleFormat, FieldPosition},
    pokemon::{PokemonIndex, PokemonView, Side},
    select::SwitchIn,
};

bitflags::bitflags! {
    /// Effects that cover a whole side of the field.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TeamStatus: u8 {
        const REFLECT = 1 << 0;
        const LIGHT_SCREEN = 1 << 1;
        const SPIKES = 1 << 2;
        const TOXIC_SPIKES = 1 << 3;
    }
}

/// One side of a battle. Membership and order of `pokemon` are fixed once
/// the battle starts; `P` is the authority's creature or a replica's mirror.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerParty<P> {
    pub side: Side,
    pub name: String,
    pub pokemon: Vec<P>,
    pub status: TeamStatus,
    pub reflect_count: u8,
    pub light_screen_count: u8,
    pub spike_count: u8,
    pub toxic_spike_count: u8,
    /// Active creatures that still have to choose this turn.
    pub actions_required: Vec<PokemonIndex>,
    pub switch_ins_required: u8,
    pub switch_in_queue: Vec<SwitchIn>,
    pub fainted_this_turn: bool,
    pub mon_fainted_last_turn: bool,
}

impl<P> PlayerParty<P> {
    pub fn new(side: Side, name: String, pokemon: Vec<P>) -> Self {
        Self {
            side,
            name,
            pokemon,
            status: TeamStatus::empty(),
            reflect_count: 0,
            light_screen_count: 0,
            spike_count: 0,
            toxic_spike_count: 0,
            actions_required: Vec::new(),
            switch_ins_required: 0,
            switch_in_queue: Vec::new(),
            fainted_this_turn: false,
            mon_fainted_last_turn: false,
        }
    }

    pub fn get(&self, index: u8) -> Option<&P> {
        self.pokemon.get(index as usize)
    }

    pub fn get_mut(&mut self, index: u8) -> Option<&mut P> {
        self.pokemon.get_mut(index as usize)
    }

    /// Number of layers of a stackable hazard, or whether a screen is up.
    pub fn layers(&self, status: TeamStatus) -> u8 {
        if status == TeamStatus::SPIKES {
            self.spike_count
        } else if status == TeamStatus::TOXIC_SPIKES {
            self.toxic_spike_count
        } else {
            self.status.contains(status) as u8
        }
    }
}

impl<P: PokemonView> PlayerParty<P> {
    pub fn at(&self, position: FieldPosition) -> Option<&P> {
        match position {
            FieldPosition::None => None,
            position => self.pokemon.iter().find(|p| p.position() == position),
        }
    }

    pub fn at_mut(&mut self, position: FieldPosition) -> Option<&mut P> {
        match position {
            FieldPosition::None => None,
            position => self.pokemon.iter_mut().find(|p| p.position() == position),
        }
    }

    pub fn active_iter(&self) -> impl Iterator<Item = &P> + '_ {
        self.pokemon.iter().filter(|p| p.on_field())
    }

    pub fn num_on_field(&self) -> usize {
        self.active_iter().count()
    }

    pub fn num_conscious(&self) -> usize {
        self.pokemon.iter().filter(|p| !p.fainted()).count()
    }

    pub fn all_fainted(&self) -> bool {
        self.num_conscious() == 0
    }

    pub fn any_replacements(&self) -> bool {
        self.pokemon.iter().any(|p| p.can_replace())
    }

    /// Legal positions without an occupant, in the order they are refilled.
    pub fn vacant_positions(&self, format: BattleFormat) -> impl Iterator<Item = FieldPosition> + '_ {
        format
            .replacement_order()
            .iter()
            .copied()
            .filter(move |position| self.at(*position).is_none())
    }

    /// How many vacant positions can be filled from the bench, filling them
    /// greedily in the format's order.
    pub fn replacements_needed(&self, format: BattleFormat) -> u8 {
        let available = self.pokemon.iter().filter(|p| p.can_replace()).count();
        self.vacant_positions(format).take(available).count() as u8
    }
}
