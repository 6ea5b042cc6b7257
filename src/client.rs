//! A non-authoritative mirror of a battle, rebuilt from the event stream.

use log::{debug, warn};

use crate::{
    data::{BattleData, FieldPosition, Weather},
    endpoint::{BattleEndpoint, ConnectionError},
    error::BattleError,
    event::{BattleEvent, Perspective, WeatherAction},
    message::{ClientMessage, ServerMessage},
    party::{PlayerParty, TeamStatus},
    pokemon::{
        percent,
        status::{Status1, StatusAction},
        PokemonIndex, PokemonView, Side, UnknownPokemon,
    },
    snapshot::BattleSnapshot,
    state::BattleState,
};

mod text;

pub struct BattleReplica {
    pub data: BattleData,
    pub perspective: Perspective,
    state: BattleState,
    pub teams: [PlayerParty<UnknownPokemon>; 2],
    known: [bool; 2],
    pub weather: Weather,
    turn: u16,
    winner: Option<Side>,
}

impl BattleReplica {
    pub fn new(data: BattleData, perspective: Perspective) -> Self {
        Self {
            data,
            perspective,
            state: BattleState::WaitingForPlayers,
            teams: Side::BOTH.map(|side| PlayerParty::new(side, String::new(), Vec::new())),
            known: [false; 2],
            weather: Weather::None,
            turn: 0,
            winner: None,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn turn(&self) -> u16 {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn team(&self, side: Side) -> &PlayerParty<UnknownPokemon> {
        &self.teams[side.index()]
    }

    fn team_mut(&mut self, side: Side) -> &mut PlayerParty<UnknownPokemon> {
        &mut self.teams[side.index()]
    }

    pub fn get(&self, id: PokemonIndex) -> Option<&UnknownPokemon> {
        self.team(id.team).get(id.index)
    }

    /// The mirror for `id`, adding placeholders up to it if the party was
    /// never revealed.
    fn pokemon_mut(&mut self, id: PokemonIndex) -> &mut UnknownPokemon {
        let team = self.team_mut(id.team);
        while team.pokemon.len() <= id.index as usize {
            let index = team.pokemon.len() as u8;
            team.pokemon
                .push(UnknownPokemon::placeholder(PokemonIndex::new(id.team, index)));
        }
        &mut team.pokemon[id.index as usize]
    }

    /// Pulls everything the host has sent so far and applies it.
    pub fn receive(
        &mut self,
        endpoint: &impl BattleEndpoint<ClientMessage, ServerMessage>,
    ) -> Result<(), BattleError> {
        loop {
            match endpoint.receive() {
                Ok(Some(ServerMessage::Join(data, perspective))) => {
                    debug!("Joined a {} battle as {:?}", data.format, perspective);
                    *self = Self::new(data, perspective);
                }
                Ok(Some(ServerMessage::Event(event))) => self.apply(&event)?,
                Ok(None) => return Ok(()),
                Err(ConnectionError::Disconnected) => {
                    warn!("Lost connection to the battle host");
                    return Ok(());
                }
            }
        }
    }

    /// Applies one event. Every event carries absolute values, so applying
    /// the same event twice leaves the replica unchanged.
    pub fn apply(&mut self, event: &BattleEvent) -> Result<(), BattleError> {
        match event {
            BattleEvent::Party { team, name, party } => {
                let known = party
                    .iter()
                    .map(|info| {
                        let mut pokemon = UnknownPokemon::placeholder(info.id);
                        pokemon.species = Some(info.species);
                        pokemon.nickname = Some(info.nickname.clone());
                        pokemon.level = Some(info.level);
                        pokemon.hp = info.hp;
                        pokemon.max_hp = info.max_hp;
                        pokemon.percent = percent(info.hp, info.max_hp);
                        pokemon.status1 = info.status1;
                        pokemon.ability = info.ability;
                        pokemon.item = info.item;
                        pokemon.moves = info.moves.clone();
                        pokemon
                    })
                    .collect();
                self.reveal(*team, name, known);
            }
            BattleEvent::PartyHidden { team, name, size } => {
                let placeholders = (0..*size)
                    .map(|index| UnknownPokemon::placeholder(PokemonIndex::new(*team, index)))
                    .collect();
                self.reveal(*team, name, placeholders);
            }
            BattleEvent::SwitchIn { switch_ins, .. } => {
                self.processing();
                for info in switch_ins {
                    let pokemon = self.pokemon_mut(info.id);
                    pokemon.species = Some(info.species);
                    pokemon.nickname = Some(info.nickname.clone());
                    pokemon.level = Some(info.level);
                    pokemon.hp = info.hp;
                    pokemon.max_hp = info.max_hp;
                    pokemon.percent = percent(info.hp, info.max_hp);
                    pokemon.status1 = info.status1;
                    pokemon.position = info.position;
                }
            }
            BattleEvent::SwitchInHidden { switch_ins, .. } => {
                self.processing();
                for info in switch_ins {
                    let pokemon = self.pokemon_mut(info.id);
                    pokemon.species = Some(info.species);
                    pokemon.nickname = Some(info.nickname.clone());
                    pokemon.level = Some(info.level);
                    pokemon.percent = info.percent;
                    pokemon.status1 = info.status1;
                    pokemon.position = info.position;
                }
            }
            BattleEvent::SwitchOut { pokemon, .. } => self.pokemon_mut(*pokemon).clear_for_switch(),
            BattleEvent::SwitchOutHidden {
                team, old_position, ..
            } => {
                // Already withdrawn if this event was applied before.
                if let Some(pokemon) = self.team_mut(*team).at_mut(*old_position) {
                    pokemon.clear_for_switch();
                }
            }
            BattleEvent::HpChanged {
                pokemon,
                new_hp,
                new_percent,
                ..
            } => {
                let pokemon = self.pokemon_mut(*pokemon);
                pokemon.hp = *new_hp;
                pokemon.percent = *new_percent;
            }
            BattleEvent::HpChangedHidden {
                pokemon,
                new_percent,
                ..
            } => self.pokemon_mut(*pokemon).percent = *new_percent,
            BattleEvent::Fainted { pokemon, .. } => {
                let pokemon = self.pokemon_mut(*pokemon);
                pokemon.hp = 0;
                pokemon.percent = 0.0;
                pokemon.clear_for_switch();
            }
            BattleEvent::FaintedHidden { team, old_position } => {
                if let Some(pokemon) = self.team_mut(*team).at_mut(*old_position) {
                    pokemon.hp = 0;
                    pokemon.percent = 0.0;
                    pokemon.clear_for_switch();
                }
            }
            BattleEvent::MoveUsed { .. }
            | BattleEvent::MoveResult { .. }
            | BattleEvent::MoveCrit { .. } => (),
            BattleEvent::PpChanged {
                pokemon,
                move_id,
                new,
                ..
            } => {
                if let Some(slot) = self.pokemon_mut(*pokemon).moves.get_mut(move_id) {
                    slot.pp = *new;
                }
            }
            BattleEvent::StatChanged {
                pokemon, stat, new, ..
            } => self.pokemon_mut(*pokemon).stages[*stat] = *new,
            BattleEvent::Status1 {
                pokemon,
                status,
                action,
            } => {
                let pokemon = self.pokemon_mut(*pokemon);
                match action {
                    StatusAction::Added => {
                        if *status == Status1::None {
                            return Err(BattleError::unreachable(format!(
                                "{} was given no status",
                                pokemon.id
                            )));
                        }
                        pokemon.status1 = *status;
                    }
                    action if action.removes() => pokemon.status1 = Status1::None,
                    _ => (),
                }
            }
            BattleEvent::Status2 {
                pokemon,
                status,
                action,
            } => {
                let pokemon = self.pokemon_mut(*pokemon);
                match action {
                    StatusAction::Added => pokemon.status2.insert(*status),
                    action if action.removes() => pokemon.status2.remove(*status),
                    _ => (),
                }
            }
            BattleEvent::TeamStatus {
                team,
                status,
                action,
                layers,
                ..
            } => {
                let party = self.team_mut(*team);
                match action {
                    StatusAction::Added => party.status.insert(*status),
                    action if action.removes() => party.status.remove(*status),
                    _ => (),
                }
                if *status == TeamStatus::SPIKES {
                    party.spike_count = *layers;
                } else if *status == TeamStatus::TOXIC_SPIKES {
                    party.toxic_spike_count = *layers;
                }
            }
            BattleEvent::Weather {
                weather, action, ..
            } => match action {
                WeatherAction::Added => self.weather = *weather,
                WeatherAction::Ended => self.weather = Weather::None,
                WeatherAction::CausedDamage => (),
            },
            BattleEvent::Ability { pokemon, ability } => {
                self.pokemon_mut(*pokemon).ability = Some(*ability)
            }
            BattleEvent::Item { pokemon, item, .. } => self.pokemon_mut(*pokemon).item = Some(*item),
            BattleEvent::TurnBegan { turn } => {
                self.turn = *turn;
                self.state = BattleState::Processing;
            }
            BattleEvent::ActionsRequest { team, pokemon } => {
                self.team_mut(*team).actions_required = pokemon.clone();
                self.state = BattleState::WaitingForActions;
            }
            BattleEvent::SwitchInRequest { team, amount } => {
                self.team_mut(*team).switch_ins_required = *amount;
                self.state = BattleState::WaitingForSwitchIns;
            }
            BattleEvent::Winner { team } => {
                self.winner = *team;
                self.state = BattleState::Ended;
            }
        }
        Ok(())
    }

    fn reveal(&mut self, side: Side, name: &str, pokemon: Vec<UnknownPokemon>) {
        let team = self.team_mut(side);
        team.name = name.to_owned();
        team.pokemon = pokemon;
        self.known[side.index()] = true;
        if self.state == BattleState::WaitingForPlayers && self.known.iter().all(|k| *k) {
            self.state = BattleState::ReadyToBegin;
        }
    }

    fn processing(&mut self) {
        if matches!(
            self.state,
            BattleState::ReadyToBegin | BattleState::WaitingForSwitchIns
        ) {
            self.state = BattleState::Processing;
        }
    }

    /// Creatures of `side` on the field.
    pub fn active(&self, side: Side) -> impl Iterator<Item = &UnknownPokemon> + '_ {
        self.team(side).active_iter()
    }

    pub fn at(&self, side: Side, position: FieldPosition) -> Option<&UnknownPokemon> {
        self.team(side).at(position)
    }

    /// Whether `id` is waiting on an action from its trainer.
    pub fn needs_action(&self, id: PokemonIndex) -> bool {
        self.team(id.team).actions_required.contains(&id)
            && self.get(id).map(|p| p.on_field()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            weather: self.weather,
            teams: [(&self.teams[0]).into(), (&self.teams[1]).into()],
        }
    }

    /// Describes an event the way a trainer watching the battle would read
    /// it. Call before applying the event, while withdrawn or fainted
    /// creatures can still be found at their old positions.
    pub fn describe(&self, event: &BattleEvent) -> Option<String> {
        text::describe(self, event)
    }
}
