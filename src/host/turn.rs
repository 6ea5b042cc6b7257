use log::debug;
use rand::Rng;

use crate::{
    data::Weather,
    engine::BattleEngine,
    error::BattleError,
    event::{BattleEvent, WeatherAction},
    party::TeamStatus,
    pokemon::{status::{Status2, StatusAction}, PokemonView, Side},
    select::TurnAction,
    state::BattleState,
};

use super::{switch_in_info, Battle};

impl Battle {
    /// Moves every queued switch-in onto the field, then runs their entry
    /// effects in the same order.
    pub(super) fn switch_in_queued(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        let mut arrived = Vec::new();

        for side in Side::BOTH {
            let queue = core::mem::take(&mut self.field.team_mut(side).switch_in_queue);
            if queue.is_empty() {
                continue;
            }
            let mut switch_ins = Vec::with_capacity(queue.len());
            for switch in queue {
                let pokemon = self.field.pokemon_mut(switch.pokemon)?;
                pokemon.position = switch.position;
                switch_ins.push(switch_in_info(pokemon));
                self.field.active_battlers.push(switch.pokemon);
                arrived.push(switch.pokemon);
            }
            self.emit(BattleEvent::SwitchIn {
                team: side,
                switch_ins,
                forced: false,
            });
        }

        for id in arrived {
            if !self.field.pokemon(id)?.fainted() {
                let outcomes = engine
                    .switch_in(random, &self.field, id)
                    .map_err(BattleError::execution)?;
                self.apply_all(outcomes)?;
            }
        }
        Ok(())
    }

    /// Ends the battle if a side is out of creatures, otherwise asks for
    /// replacements or, if none are needed, for actions.
    pub(super) fn request_switch_ins_or_actions(&mut self) -> Result<(), BattleError> {
        if self.check_winner() {
            return Ok(());
        }

        let format = self.field.data.format;
        let mut any = false;
        for side in Side::BOTH {
            let team = self.field.team_mut(side);
            let amount = team.replacements_needed(format);
            team.switch_ins_required = amount;
            if amount > 0 {
                any = true;
                self.emit(BattleEvent::SwitchInRequest { team: side, amount });
            }
        }

        match any {
            true => {
                debug!("Waiting for switch-ins");
                self.state = BattleState::WaitingForSwitchIns;
            }
            false => self.request_actions(),
        }
        Ok(())
    }

    pub(super) fn request_actions(&mut self) {
        for side in Side::BOTH {
            let pokemon: Vec<_> = self.field.active_on(side).map(|p| p.id).collect();
            self.field.team_mut(side).actions_required = pokemon.clone();
            if !pokemon.is_empty() {
                self.emit(BattleEvent::ActionsRequest {
                    team: side,
                    pokemon,
                });
            }
        }
        debug!("Waiting for actions");
        self.state = BattleState::WaitingForActions;
    }

    /// Ends the battle when a team has nobody left standing. Both teams
    /// falling together is a draw.
    pub(super) fn check_winner(&mut self) -> bool {
        let home = self.field.team(Side::Home).all_fainted();
        let away = self.field.team(Side::Away).all_fainted();
        let winner = match (home, away) {
            (false, false) => return false,
            (true, true) => None,
            (true, false) => Some(Side::Away),
            (false, true) => Some(Side::Home),
        };
        self.end(winner);
        true
    }

    pub(super) fn turn_ended(
        &mut self,
        random: &mut impl Rng,
        engine: &impl BattleEngine,
    ) -> Result<(), BattleError> {
        if self.field.weather != Weather::None && self.field.weather_counter > 0 {
            self.field.weather_counter -= 1;
            if self.field.weather_counter == 0 {
                let weather = core::mem::replace(&mut self.field.weather, Weather::None);
                self.emit(BattleEvent::Weather {
                    weather,
                    action: WeatherAction::Ended,
                    victim: None,
                });
            }
        }

        for id in self.field.active_battlers.clone() {
            let pokemon = self.field.pokemon_mut(id)?;
            pokemon.selected_action = None;
            let cleared = pokemon.status2 & Status2::TURN;
            pokemon.status2.remove(cleared);

            let protected = match pokemon.previous_action {
                Some(TurnAction::Fight { move_id, .. }) => engine
                    .get_move(&move_id)
                    .map(|m| m.is_protection())
                    .unwrap_or_default(),
                _ => false,
            };
            if !protected {
                pokemon.protect_counter = 0;
            }
            let conscious = !pokemon.fainted();

            for status in cleared.iter() {
                self.emit(BattleEvent::Status2 {
                    pokemon: id,
                    status,
                    action: StatusAction::Ended,
                });
            }

            if conscious {
                let outcomes = engine
                    .turn_end(random, &self.field, id)
                    .map_err(BattleError::execution)?;
                self.apply_all(outcomes)?;
            }
        }

        if self.check_winner() {
            return Ok(());
        }

        for side in Side::BOTH {
            for status in [TeamStatus::REFLECT, TeamStatus::LIGHT_SCREEN] {
                let team = self.field.team_mut(side);
                if !team.status.contains(status) {
                    continue;
                }
                let counter = match status == TeamStatus::REFLECT {
                    true => &mut team.reflect_count,
                    false => &mut team.light_screen_count,
                };
                *counter = counter.saturating_sub(1);
                if *counter == 0 {
                    team.status.remove(status);
                    self.emit(BattleEvent::TeamStatus {
                        team: side,
                        status,
                        action: StatusAction::Ended,
                        victim: None,
                        layers: 0,
                    });
                }
            }
            let team = self.field.team_mut(side);
            team.mon_fainted_last_turn = core::mem::take(&mut team.fainted_this_turn);
        }

        self.request_switch_ins_or_actions()
    }
}
