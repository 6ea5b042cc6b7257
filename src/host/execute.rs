use log::debug;
use rand::Rng;

use crate::{
    data::Weather,
    engine::{BattleEngine, Outcome},
    error::{BattleError, InvalidArgument},
    event::{BattleEvent, WeatherAction},
    moves::MoveId,
    party::TeamStatus,
    pokedex::Health,
    pokemon::{
        percent,
        status::{Status1, Status2, StatusAction},
        BattlePokemon, PokemonIndex, PokemonView,
    },
    select::{Target, TurnAction},
};

use super::{switch_in_info, Battle};

impl Battle {
    pub(super) fn run_actions_in_order(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        for id in self.turn_order.clone() {
            let pokemon = self.field.pokemon(id)?;
            if pokemon.fainted() {
                debug!("Skipping {}, it fainted", pokemon.nickname);
                continue;
            }
            let action = pokemon.selected_action.ok_or_else(|| {
                BattleError::unreachable(format!("{} is in the turn order without an action", id))
            })?;

            match action {
                TurnAction::Fight { move_id, target } => {
                    self.use_move(random, engine, id, move_id, target)?
                }
                TurnAction::Switch(replacement) => {
                    self.switch_out(random, engine, id, replacement)?
                }
            }

            self.field.pokemon_mut(id)?.previous_action = Some(action);
        }
        Ok(())
    }

    fn use_move(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
        user: PokemonIndex,
        move_id: MoveId,
        target: Option<Target>,
    ) -> Result<(), BattleError> {
        let pre = engine
            .before_move(random, &self.field, user)
            .map_err(BattleError::execution)?;
        self.apply_all(pre.outcomes)?;
        if !pre.proceed || self.field.pokemon(user)?.fainted() {
            return Ok(());
        }

        let slot = self
            .field
            .pokemon_mut(user)?
            .moves
            .get_mut(&move_id)
            .ok_or(InvalidArgument::MoveNotKnown(user, move_id))?;
        let old = slot.pp;
        let new = slot.decrement();

        self.emit(BattleEvent::MoveUsed { user, move_id });
        self.emit(BattleEvent::PpChanged {
            pokemon: user,
            move_id,
            old,
            new,
        });

        let outcomes = engine
            .execute(random, &self.field, user, &move_id, target)
            .map_err(BattleError::execution)?;
        self.apply_all(outcomes)
    }

    /// Withdraws `id` and sends `replacement` to the position it held.
    fn switch_out(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
        id: PokemonIndex,
        replacement: PokemonIndex,
    ) -> Result<(), BattleError> {
        let pokemon = self.field.pokemon_mut(id)?;
        let position = pokemon.position;
        pokemon.clear_for_switch();
        self.field.active_battlers.retain(|a| *a != id);
        self.emit(BattleEvent::SwitchOut {
            pokemon: id,
            old_position: position,
            forced: false,
        });

        let pokemon = self.field.pokemon_mut(replacement)?;
        if !pokemon.can_replace() {
            return Err(BattleError::unreachable(format!(
                "{} cannot replace {}",
                replacement, id
            )));
        }
        pokemon.position = position;
        let info = switch_in_info(pokemon);
        self.field.active_battlers.push(replacement);
        self.emit(BattleEvent::SwitchIn {
            team: replacement.team,
            switch_ins: vec![info],
            forced: false,
        });

        let outcomes = engine
            .switch_in(random, &self.field, replacement)
            .map_err(BattleError::execution)?;
        self.apply_all(outcomes)
    }

    pub(super) fn apply_all(&mut self, outcomes: Vec<Outcome>) -> Result<(), BattleError> {
        outcomes.into_iter().try_for_each(|o| self.apply(o))
    }

    /// Writes one outcome into the field and records it.
    fn apply(&mut self, outcome: Outcome) -> Result<(), BattleError> {
        if let Some(subject) = outcome.subject() {
            if self.field.pokemon(subject)?.fainted() {
                debug!("Skipping {:?}, {} has fainted", outcome, subject);
                return Ok(());
            }
        }

        let settings = self.field.data.settings;

        match outcome {
            Outcome::Damage { target, amount } => {
                let pokemon = self.field.pokemon_mut(target)?;
                let old_hp = pokemon.hp;
                pokemon.hp = pokemon.hp.saturating_sub(amount);
                if pokemon.hp != old_hp {
                    let event = hp_event(pokemon, old_hp);
                    let fainted = pokemon.fainted();
                    self.emit(event);
                    if fainted {
                        self.faint(target)?;
                    }
                }
            }
            Outcome::Heal { target, amount } => {
                let pokemon = self.field.pokemon_mut(target)?;
                let old_hp = pokemon.hp;
                pokemon.hp = pokemon.hp.saturating_add(amount).min(pokemon.max_hp);
                if pokemon.hp != old_hp {
                    let event = hp_event(pokemon, old_hp);
                    self.emit(event);
                }
            }
            Outcome::Crit { victim } => self.emit(BattleEvent::MoveCrit { victim }),
            Outcome::Result {
                user,
                target,
                result,
            } => self.emit(BattleEvent::MoveResult {
                user,
                target,
                result,
            }),
            Outcome::Status1 {
                target,
                status,
                action,
                counter,
            } => {
                let pokemon = self.field.pokemon_mut(target)?;
                match action {
                    StatusAction::Added => {
                        if status == Status1::None {
                            return Err(BattleError::unreachable(format!(
                                "{} was given no status",
                                target
                            )));
                        }
                        pokemon.status1 = status;
                        pokemon.status1_counter = counter;
                    }
                    action if action.removes() => {
                        pokemon.status1 = Status1::None;
                        pokemon.status1_counter = 0;
                    }
                    _ => pokemon.status1_counter = counter,
                }
                self.emit(BattleEvent::Status1 {
                    pokemon: target,
                    status,
                    action,
                });
            }
            Outcome::Status2 {
                target,
                status,
                action,
            } => {
                let pokemon = self.field.pokemon_mut(target)?;
                match action {
                    StatusAction::Added => {
                        pokemon.status2.insert(status);
                        if status.intersects(Status2::PROTECTED | Status2::ENDURING) {
                            pokemon.protect_counter = pokemon.protect_counter.saturating_add(1);
                        }
                    }
                    action if action.removes() => pokemon.status2.remove(status),
                    _ => (),
                }
                self.emit(BattleEvent::Status2 {
                    pokemon: target,
                    status,
                    action,
                });
            }
            Outcome::StatChange {
                target,
                stat,
                change,
            } => {
                let pokemon = self.field.pokemon_mut(target)?;
                let old = pokemon.stages[stat];
                let new = pokemon
                    .stages
                    .change_stage(stat, change, settings.max_stat_change);
                self.emit(BattleEvent::StatChanged {
                    pokemon: target,
                    stat,
                    old,
                    new,
                });
            }
            Outcome::TeamStatus {
                team: side,
                status,
                action,
                victim,
            } => {
                if status.bits().count_ones() != 1 {
                    return Err(BattleError::unreachable(format!(
                        "team status {:?} is not a single status",
                        status
                    )));
                }
                let team = self.field.team_mut(side);
                match action {
                    StatusAction::Added => {
                        if status == TeamStatus::REFLECT {
                            team.reflect_count = settings.screen_turns;
                        } else if status == TeamStatus::LIGHT_SCREEN {
                            team.light_screen_count = settings.screen_turns;
                        } else if status == TeamStatus::SPIKES {
                            team.spike_count = (team.spike_count + 1).min(settings.max_spikes);
                        } else {
                            team.toxic_spike_count =
                                (team.toxic_spike_count + 1).min(settings.max_toxic_spikes);
                        }
                        team.status.insert(status);
                    }
                    action if action.removes() => {
                        team.status.remove(status);
                        if status == TeamStatus::REFLECT {
                            team.reflect_count = 0;
                        } else if status == TeamStatus::LIGHT_SCREEN {
                            team.light_screen_count = 0;
                        } else if status == TeamStatus::SPIKES {
                            team.spike_count = 0;
                        } else {
                            team.toxic_spike_count = 0;
                        }
                    }
                    _ => (),
                }
                let layers = team.layers(status);
                self.emit(BattleEvent::TeamStatus {
                    team: side,
                    status,
                    action,
                    victim,
                    layers,
                });
            }
            Outcome::Weather {
                weather,
                action,
                turns,
                victim,
            } => {
                match action {
                    WeatherAction::Added => {
                        if weather == Weather::None {
                            return Err(BattleError::unreachable("cleared weather was added"));
                        }
                        self.field.weather = weather;
                        self.field.weather_counter = turns;
                    }
                    WeatherAction::Ended => {
                        self.field.weather = Weather::None;
                        self.field.weather_counter = 0;
                    }
                    WeatherAction::CausedDamage => (),
                }
                self.emit(BattleEvent::Weather {
                    weather,
                    action,
                    victim,
                });
            }
            Outcome::Ability { pokemon, ability } => {
                self.emit(BattleEvent::Ability { pokemon, ability })
            }
            Outcome::Item {
                pokemon,
                item,
                action,
            } => self.emit(BattleEvent::Item {
                pokemon,
                item,
                action,
            }),
        }
        Ok(())
    }

    /// Takes a creature with no HP left off the field.
    fn faint(&mut self, id: PokemonIndex) -> Result<(), BattleError> {
        let pokemon = self.field.pokemon_mut(id)?;
        let old_position = pokemon.position;
        pokemon.clear_for_switch();
        self.field.active_battlers.retain(|a| *a != id);
        self.field.team_mut(id.team).fainted_this_turn = true;
        self.emit(BattleEvent::Fainted {
            pokemon: id,
            old_position,
        });
        Ok(())
    }
}

fn hp_event(pokemon: &BattlePokemon, old_hp: Health) -> BattleEvent {
    BattleEvent::HpChanged {
        pokemon: pokemon.id,
        old_hp,
        new_hp: pokemon.hp,
        old_percent: percent(old_hp, pokemon.max_hp),
        new_percent: pokemon.percent_hp(),
    }
}
