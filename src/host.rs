//! Battle host: the authoritative state machine.

use log::{debug, info, warn};
use rand::Rng;

use crate::{
    data::{BattleData, Weather},
    engine::BattleEngine,
    error::{BattleError, InvalidArgument, ProtocolError},
    event::{BattleEvent, Perspective, PokemonInfo, SwitchInInfo},
    field::Field,
    message::{ClientMessage, ServerMessage},
    party::PlayerParty,
    player::TeamShell,
    pokemon::{BattlePokemon, PokemonIndex, PokemonView, Side},
    select::{SwitchIn, TurnAction},
    snapshot::BattleSnapshot,
    state::BattleState,
};

mod execute;
mod observer;
mod queue;
mod turn;

#[cfg(all(test, feature = "default_engine", feature = "mpsc_endpoint"))]
mod tests;

pub use observer::PlayerEndpoint;
pub use queue::{effective_speed, turn_order};

use observer::Observer;

pub struct Battle {
    state: BattleState,
    field: Field,
    ready: [bool; 2],
    turn: u16,
    turn_order: Vec<PokemonIndex>,
    winner: Option<Side>,
    events: Vec<BattleEvent>,
    observers: Vec<Observer>,
}

impl Battle {
    /// A battle with both teams known, ready to begin.
    pub fn new(
        data: BattleData,
        engine: &impl BattleEngine,
        home: TeamShell,
        away: TeamShell,
    ) -> Result<Self, BattleError> {
        let mut battle = Self::waiting(data)?;
        battle.set_team(Side::Home, home, engine)?;
        battle.set_team(Side::Away, away, engine)?;
        Ok(battle)
    }

    /// A battle waiting for both teams to be set.
    pub fn waiting(data: BattleData) -> Result<Self, BattleError> {
        data.settings.validate()?;
        Ok(Self {
            state: BattleState::WaitingForPlayers,
            field: Field {
                data,
                teams: Side::BOTH.map(|side| PlayerParty::new(side, String::new(), Vec::new())),
                active_battlers: Vec::new(),
                weather: Weather::None,
                weather_counter: 0,
            },
            ready: [false; 2],
            turn: 0,
            turn_order: Vec::new(),
            winner: None,
            events: Vec::new(),
            observers: Vec::new(),
        })
    }

    pub fn set_team(
        &mut self,
        side: Side,
        team: TeamShell,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        self.expect(BattleState::WaitingForPlayers)?;
        if self.ready[side.index()] {
            return Err(ProtocolError::TeamAlreadySet(side).into());
        }

        let settings = self.field.data.settings;
        let size = team.party.len();
        if size == 0 || size > settings.max_party_size as usize {
            return Err(InvalidArgument::PartySize(side, size).into());
        }

        let pokemon = team
            .party
            .into_iter()
            .enumerate()
            .map(|(index, shell)| {
                BattlePokemon::new(
                    PokemonIndex::new(side, index as u8),
                    shell,
                    settings.num_moves,
                    |id| engine.get_move(id).map(|m| m.pp),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut party = PlayerParty::new(side, team.name, pokemon);
        party.switch_in_queue = party
            .pokemon
            .iter()
            .zip(self.field.data.format.starting_positions())
            .map(|(pokemon, position)| SwitchIn::new(pokemon.id, *position))
            .collect();

        *self.field.team_mut(side) = party;
        self.ready[side.index()] = true;

        if self.ready.iter().all(|r| *r) {
            self.state = BattleState::ReadyToBegin;
        }
        Ok(())
    }

    /// Registers a trainer or spectator. Team observers may submit actions
    /// through [`Battle::update`].
    pub fn add_observer(&mut self, perspective: Perspective, endpoint: PlayerEndpoint) {
        let observer = Observer {
            perspective,
            endpoint,
        };
        match observer.send(ServerMessage::Join(self.field.data, perspective)) {
            Ok(()) => self.observers.push(observer),
            Err(err) => warn!("Could not add observer {:?}: {}", perspective, err),
        }
    }

    /// Sends out each team's leads, runs their entry effects and asks for
    /// the first actions.
    pub fn begin(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        self.expect(BattleState::ReadyToBegin)?;
        self.state = BattleState::Processing;
        debug!("Beginning {} battle", self.field.data.format);

        for side in Side::BOTH {
            let team = self.field.team(side);
            let event = BattleEvent::Party {
                team: side,
                name: team.name.clone(),
                party: team.pokemon.iter().map(pokemon_info).collect(),
            };
            self.emit(event);
        }

        self.switch_in_queued(random, engine)?;
        self.request_switch_ins_or_actions()
    }

    /// Chooses what an active creature does this turn. Once every active
    /// creature has chosen, the turn is ready to run.
    pub fn select_action(
        &mut self,
        pokemon: PokemonIndex,
        action: TurnAction,
    ) -> Result<(), BattleError> {
        self.expect(BattleState::WaitingForActions)?;
        self.check_action(pokemon, &action)?;
        self.commit_action(pokemon, action)
    }

    /// Chooses actions for several creatures of `side`. Either every action
    /// is accepted or none is.
    pub fn select_actions(
        &mut self,
        side: Side,
        actions: impl IntoIterator<Item = (PokemonIndex, TurnAction)>,
    ) -> Result<(), BattleError> {
        self.expect(BattleState::WaitingForActions)?;
        let actions: Vec<_> = actions.into_iter().collect();
        for (i, (pokemon, action)) in actions.iter().enumerate() {
            let earlier = &actions[..i];
            if pokemon.team != side || earlier.iter().any(|(p, _)| p == pokemon) {
                return Err(ProtocolError::ActionNotRequired(*pokemon).into());
            }
            self.check_action(*pokemon, action)?;
            if let TurnAction::Switch(replacement) = action {
                if earlier.iter().any(|(_, a)| a == action) {
                    return Err(InvalidArgument::CannotSwitchIn(*replacement).into());
                }
            }
        }
        for (pokemon, action) in actions {
            self.commit_action(pokemon, action)?;
        }
        Ok(())
    }

    fn check_action(&self, pokemon: PokemonIndex, action: &TurnAction) -> Result<(), BattleError> {
        if !self
            .field
            .team(pokemon.team)
            .actions_required
            .contains(&pokemon)
        {
            return Err(ProtocolError::ActionNotRequired(pokemon).into());
        }
        self.validate_action(pokemon, action)
    }

    fn commit_action(
        &mut self,
        pokemon: PokemonIndex,
        action: TurnAction,
    ) -> Result<(), BattleError> {
        self.field.pokemon_mut(pokemon)?.selected_action = Some(action);
        self.field
            .team_mut(pokemon.team)
            .actions_required
            .retain(|id| *id != pokemon);

        if self
            .field
            .teams
            .iter()
            .all(|team| team.actions_required.is_empty())
        {
            self.state = BattleState::ReadyToRunTurn;
        }
        Ok(())
    }

    fn validate_action(&self, id: PokemonIndex, action: &TurnAction) -> Result<(), BattleError> {
        let pokemon = self.field.pokemon(id)?;
        match action {
            TurnAction::Fight { move_id, target } => {
                let slot = pokemon
                    .moves
                    .get(move_id)
                    .ok_or(InvalidArgument::MoveNotKnown(id, *move_id))?;
                if slot.is_empty() {
                    return Err(InvalidArgument::NoPP(id, *move_id).into());
                }
                if let Some(target) = target {
                    let format = self.field.data.format;
                    if !format.is_legal(target.position) {
                        return Err(InvalidArgument::IllegalPosition(target.position, format).into());
                    }
                }
            }
            TurnAction::Switch(replacement) => {
                let team = self.field.team(id.team);
                let taken = team.pokemon.iter().any(|p| {
                    p.selected_action == Some(TurnAction::Switch(*replacement))
                });
                let available = replacement.team == id.team
                    && self.field.pokemon(*replacement)?.can_replace();
                if taken || !available {
                    return Err(InvalidArgument::CannotSwitchIn(*replacement).into());
                }
            }
        }
        Ok(())
    }

    /// Sends replacements into vacant positions. Once every team's
    /// requirement is met they all enter together.
    pub fn select_switches(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
        side: Side,
        switches: &[SwitchIn],
    ) -> Result<(), BattleError> {
        self.expect(BattleState::WaitingForSwitchIns)?;
        let format = self.field.data.format;
        let team = self.field.team(side);
        if team.switch_ins_required == 0 {
            return Err(ProtocolError::NoSwitchInsRequired(side).into());
        }
        if switches.len() > team.switch_ins_required as usize {
            return Err(ProtocolError::TooManySwitchIns(side).into());
        }

        let mut queue = team.switch_in_queue.clone();
        for switch in switches {
            let available = switch.pokemon.team == side
                && self.field.pokemon(switch.pokemon)?.can_replace()
                && !queue.iter().any(|q| q.pokemon == switch.pokemon);
            if !available {
                return Err(InvalidArgument::CannotSwitchIn(switch.pokemon).into());
            }
            if !format.is_legal(switch.position) {
                return Err(InvalidArgument::IllegalPosition(switch.position, format).into());
            }
            if team.at(switch.position).is_some()
                || queue.iter().any(|q| q.position == switch.position)
            {
                return Err(InvalidArgument::PositionTaken(side, switch.position).into());
            }
            queue.push(*switch);
        }

        let team = self.field.team_mut(side);
        team.switch_ins_required -= switches.len() as u8;
        team.switch_in_queue = queue;

        if self
            .field
            .teams
            .iter()
            .all(|team| team.switch_ins_required == 0)
        {
            self.state = BattleState::Processing;
            self.switch_in_queued(random, engine)?;
            self.request_switch_ins_or_actions()?;
        }
        Ok(())
    }

    /// Resolves one full turn.
    ///
    /// An error from the engine is fatal: the battle is left in
    /// `Processing` with the turn half run, and every later call is
    /// rejected as out of turn.
    pub fn run_turn(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        self.expect(BattleState::ReadyToRunTurn)?;
        self.state = BattleState::Processing;
        self.turn += 1;
        self.emit(BattleEvent::TurnBegan { turn: self.turn });

        self.turn_order = queue::turn_order(&self.field, engine, random)?;
        self.run_actions_in_order(random, engine)?;
        self.turn_ended(random, engine)
    }

    /// Reads submissions from connected trainers and runs the turn once
    /// everyone has chosen. A rejected submission is dropped and its
    /// trainer is sent their pending request again; the rest still apply.
    pub fn update(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        let mut messages = Vec::new();
        self.observers.retain(|observer| loop {
            match observer.receive() {
                Ok(Some(message)) => {
                    if let Perspective::Team(side) = observer.perspective {
                        messages.push((side, message));
                    }
                }
                Ok(None) => break true,
                Err(err) => {
                    warn!("Dropping observer {:?}: {}", observer.perspective, err);
                    break false;
                }
            }
        });

        for (side, message) in messages {
            let result = match message {
                ClientMessage::Actions(actions) => self.select_actions(side, actions),
                ClientMessage::Switches(switches) => {
                    self.select_switches(random, engine, side, &switches)
                }
            };
            match result {
                Ok(()) => (),
                Err(err @ (BattleError::Protocol(..) | BattleError::InvalidArgument(..))) => {
                    warn!("Rejected a submission from {}: {}", side, err);
                    self.remind(side);
                }
                Err(err) => return Err(err),
            }
        }

        if self.state == BattleState::ReadyToRunTurn {
            self.run_turn(random, engine)?;
        }
        Ok(())
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn turn(&self) -> u16 {
        self.turn
    }

    /// Order of the last turn that ran.
    pub fn turn_order(&self) -> &[PokemonIndex] {
        &self.turn_order
    }

    /// `None` while running and for a draw.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.field.snapshot()
    }

    fn expect(&self, expected: BattleState) -> Result<(), ProtocolError> {
        match self.state == expected {
            true => Ok(()),
            false => Err(ProtocolError::WrongState {
                expected,
                actual: self.state,
            }),
        }
    }

    /// Resends `side` whatever it still owes the battle.
    fn remind(&mut self, side: Side) {
        let team = self.field.team(side);
        let event = match self.state {
            BattleState::WaitingForActions if !team.actions_required.is_empty() => {
                BattleEvent::ActionsRequest {
                    team: side,
                    pokemon: team.actions_required.clone(),
                }
            }
            BattleState::WaitingForSwitchIns if team.switch_ins_required > 0 => {
                BattleEvent::SwitchInRequest {
                    team: side,
                    amount: team.switch_ins_required,
                }
            }
            _ => return,
        };
        self.observers.retain(|observer| {
            if observer.perspective != Perspective::Team(side) {
                return true;
            }
            match observer.send_event(&event) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Dropping observer {:?}: {}", observer.perspective, err);
                    false
                }
            }
        });
    }

    fn emit(&mut self, event: BattleEvent) {
        self.observers
            .retain(|observer| match observer.send_event(&event) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Dropping observer {:?}: {}", observer.perspective, err);
                    false
                }
            });
        self.events.push(event);
    }

    fn end(&mut self, winner: Option<Side>) {
        match winner {
            Some(side) => info!("{} won the battle", self.field.team(side).name),
            None => info!("The battle ended in a draw"),
        }
        self.winner = winner;
        self.state = BattleState::Ended;
        self.emit(BattleEvent::Winner { team: winner });
    }
}

fn pokemon_info(pokemon: &BattlePokemon) -> PokemonInfo {
    PokemonInfo {
        id: pokemon.id,
        species: pokemon.species,
        nickname: pokemon.nickname.clone(),
        level: pokemon.level,
        hp: pokemon.hp,
        max_hp: pokemon.max_hp,
        status1: pokemon.status1,
        ability: pokemon.ability,
        item: pokemon.item,
        moves: pokemon.moves.clone(),
    }
}

fn switch_in_info(pokemon: &BattlePokemon) -> SwitchInInfo {
    SwitchInInfo {
        id: pokemon.id,
        species: pokemon.species,
        nickname: pokemon.nickname.clone(),
        level: pokemon.level,
        hp: pokemon.hp,
        max_hp: pokemon.max_hp,
        status1: pokemon.status1,
        position: pokemon.position,
    }
}
