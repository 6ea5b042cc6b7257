//! A table-driven effect engine covering the built-in moves, items and
//! abilities.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

use hashbrown::HashMap;
use log::trace;
use rand::Rng;

use crate::{
    data::Weather,
    engine::{BattleEngine, Outcome, PreMove},
    event::{MoveResult, WeatherAction},
    field::Field,
    moves::{MoveData, MoveFlags, MoveId, MoveTarget},
    party::TeamStatus,
    pokedex::Ability,
    pokemon::{
        status::{Status1, Status2, StatusAction},
        BattlePokemon, PokemonIndex,
    },
    select::Target,
};

mod damage;
mod hooks;
pub mod moves;
mod target;

pub use damage::DamageResult;
use moves::*;

pub type EngineMoves = HashMap<MoveId, EngineMove>;

pub struct DefaultEngine {
    pub moves: EngineMoves,
}

impl DefaultEngine {
    pub fn new() -> Self {
        Self {
            moves: moves::moves(),
        }
    }

    /// An engine with no moves, to be filled by the caller.
    pub fn empty() -> Self {
        Self {
            moves: Default::default(),
        }
    }

    fn pokemon<'a>(
        &self,
        field: &'a Field,
        id: PokemonIndex,
    ) -> Result<&'a BattlePokemon, DefaultError> {
        field.get(id).ok_or(DefaultError::NoPokemon(id))
    }
}

impl Default for DefaultEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleEngine for DefaultEngine {
    type ExecutionError = DefaultError;

    fn get_move(&self, id: &MoveId) -> Option<&MoveData> {
        self.moves.get(id).map(|m| &m.data)
    }

    fn before_move(
        &self,
        random: &mut impl Rng,
        field: &Field,
        user: PokemonIndex,
    ) -> Result<PreMove, Self::ExecutionError> {
        let pokemon = self.pokemon(field, user)?;
        Ok(hooks::before_move(random, pokemon, field))
    }

    fn execute(
        &self,
        random: &mut impl Rng,
        field: &Field,
        user: PokemonIndex,
        move_id: &MoveId,
        target: Option<Target>,
    ) -> Result<Vec<Outcome>, Self::ExecutionError> {
        let m = self
            .moves
            .get(move_id)
            .ok_or(DefaultError::UnknownMove(*move_id))?;

        let actions = match &m.usage {
            MoveExecution::Actions(actions) => actions,
            MoveExecution::None => return Err(DefaultError::Unimplemented(*move_id)),
        };

        let user = self.pokemon(field, user)?;
        let targets = target::create_targets(field, random, user, m.data.target, target);
        trace!("{} targets {:?} with {}", user.id, targets, move_id);

        let mut outcomes = Vec::new();

        if targets.is_empty() {
            outcomes.push(Outcome::Result {
                user: user.id,
                target: user.id,
                result: MoveResult::NoTarget,
            });
            return Ok(outcomes);
        }

        for target in targets {
            let target = self.pokemon(field, target)?;
            let other = target.id != user.id;

            if other
                && target.status2.contains(Status2::PROTECTED)
                && m.data.flags.contains(MoveFlags::BLOCKED_BY_PROTECT)
            {
                outcomes.push(Outcome::Status2 {
                    target: target.id,
                    status: Status2::PROTECTED,
                    action: StatusAction::Damage,
                });
                continue;
            }

            if other && !damage::throw_move(random, m.data.accuracy, user, target) {
                outcomes.push(Outcome::Result {
                    user: user.id,
                    target: target.id,
                    result: MoveResult::Missed,
                });
                continue;
            }

            let mut usage = Usage {
                random: &mut *random,
                field,
                data: &m.data,
                user,
                target,
                outcomes: &mut outcomes,
                substitute: other && target.status2.contains(Status2::SUBSTITUTE),
            };
            usage.run(actions, true);
        }

        Ok(outcomes)
    }

    fn switch_in(
        &self,
        _: &mut impl Rng,
        field: &Field,
        pokemon: PokemonIndex,
    ) -> Result<Vec<Outcome>, Self::ExecutionError> {
        let pokemon = self.pokemon(field, pokemon)?;
        Ok(hooks::switch_in(pokemon, field))
    }

    fn turn_end(
        &self,
        _: &mut impl Rng,
        field: &Field,
        pokemon: PokemonIndex,
    ) -> Result<Vec<Outcome>, Self::ExecutionError> {
        let pokemon = self.pokemon(field, pokemon)?;
        Ok(hooks::turn_end(
            pokemon,
            field,
            field.data.settings.max_stat_change,
        ))
    }
}

/// One move landing on one target.
struct Usage<'a, R: Rng> {
    random: &'a mut R,
    field: &'a Field,
    data: &'a MoveData,
    user: &'a BattlePokemon,
    target: &'a BattlePokemon,
    outcomes: &'a mut Vec<Outcome>,
    /// The target hides behind a substitute the move has to get through.
    substitute: bool,
}

impl<'a, R: Rng> Usage<'a, R> {
    fn result(&mut self, result: MoveResult) {
        self.outcomes.push(Outcome::Result {
            user: self.user.id,
            target: self.target.id,
            result,
        });
    }

    /// `primary` is false for secondary effects, which fail silently.
    fn run(&mut self, actions: &[MoveUse], primary: bool) {
        for action in actions {
            if !self.run_one(action, primary) {
                break;
            }
        }
    }

    /// Returns `false` when the remaining effects should not run.
    fn run_one(&mut self, action: &MoveUse, primary: bool) -> bool {
        let target = self.target.id;
        match action {
            MoveUse::Damage(kind) => {
                let result =
                    damage::move_damage(self.random, self.field, self.data, *kind, self.user, self.target);
                if self.substitute {
                    self.outcomes.push(Outcome::Status2 {
                        target,
                        status: Status2::SUBSTITUTE,
                        action: StatusAction::Damage,
                    });
                    self.outcomes.push(Outcome::Status2 {
                        target,
                        status: Status2::SUBSTITUTE,
                        action: StatusAction::Ended,
                    });
                    return false;
                }
                if result.crit {
                    self.outcomes.push(Outcome::Crit { victim: target });
                }
                self.outcomes.push(Outcome::Damage {
                    target,
                    amount: result.damage,
                });
            }
            MoveUse::Status1(status) => {
                if self.substitute {
                    if primary {
                        self.result(MoveResult::IneffectiveSubstitute);
                    }
                    return false;
                }
                if self.target.status1 != Status1::None {
                    if primary {
                        self.result(MoveResult::IneffectiveStatus);
                    }
                    return false;
                }
                let immune = matches!(
                    (status, self.target.ability),
                    (Status1::Asleep, Some(Ability::Insomnia))
                        | (Status1::Paralyzed, Some(Ability::Limber))
                        | (
                            Status1::Poisoned | Status1::BadlyPoisoned,
                            Some(Ability::Immunity)
                        )
                );
                if immune {
                    if primary {
                        self.result(MoveResult::IneffectiveAbility);
                    }
                    return false;
                }
                let counter = match status {
                    Status1::Asleep => self.random.gen_range(1..=3),
                    Status1::BadlyPoisoned => 1,
                    _ => 0,
                };
                self.outcomes.push(Outcome::Status1 {
                    target,
                    status: *status,
                    action: StatusAction::Added,
                    counter,
                });
            }
            MoveUse::Confuse => {
                if self.substitute {
                    if primary {
                        self.result(MoveResult::IneffectiveSubstitute);
                    }
                    return false;
                }
                if self.target.status2.contains(Status2::CONFUSED) {
                    self.outcomes.push(Outcome::Status2 {
                        target,
                        status: Status2::CONFUSED,
                        action: StatusAction::Announced,
                    });
                    return false;
                }
                self.outcomes.push(Outcome::Status2 {
                    target,
                    status: Status2::CONFUSED,
                    action: StatusAction::Added,
                });
            }
            MoveUse::Flinch => {
                if !self.substitute {
                    self.outcomes.push(Outcome::Status2 {
                        target,
                        status: Status2::FLINCHING,
                        action: StatusAction::Added,
                    });
                }
            }
            MoveUse::Stat(stat, change, on_user) => {
                let receiver = match *on_user {
                    true => self.user.id,
                    false if self.substitute => {
                        if primary {
                            self.result(MoveResult::IneffectiveSubstitute);
                        }
                        return false;
                    }
                    false => target,
                };
                self.outcomes.push(Outcome::StatChange {
                    target: receiver,
                    stat: *stat,
                    change: *change,
                });
            }
            MoveUse::Heal(percent) => {
                if self.target.hp >= self.target.max_hp {
                    self.result(MoveResult::Failed);
                    return false;
                }
                let amount = (self.target.max_hp as u32 * *percent as u32 / 100).max(1);
                self.outcomes.push(Outcome::Heal {
                    target,
                    amount: amount as u16,
                });
            }
            MoveUse::Protect | MoveUse::Endure => {
                let chance = 1.0 / 2f64.powi(self.user.protect_counter as i32);
                if !self.random.gen_bool(chance.clamp(0.0, 1.0)) {
                    self.result(MoveResult::Failed);
                    return false;
                }
                let status = match action {
                    MoveUse::Protect => Status2::PROTECTED,
                    _ => Status2::ENDURING,
                };
                self.outcomes.push(Outcome::Status2 {
                    target,
                    status,
                    action: StatusAction::Added,
                });
            }
            MoveUse::HelpingHand => {
                if target == self.user.id || self.target.status2.contains(Status2::HELPING_HAND) {
                    self.result(MoveResult::Failed);
                    return false;
                }
                self.outcomes.push(Outcome::Status2 {
                    target,
                    status: Status2::HELPING_HAND,
                    action: StatusAction::Added,
                });
            }
            MoveUse::Substitute => {
                let cost = damage::fraction(self.user.max_hp, 4);
                if self.user.status2.contains(Status2::SUBSTITUTE) || self.user.hp <= cost {
                    self.result(MoveResult::Failed);
                    return false;
                }
                self.outcomes.push(Outcome::Damage {
                    target: self.user.id,
                    amount: cost,
                });
                self.outcomes.push(Outcome::Status2 {
                    target: self.user.id,
                    status: Status2::SUBSTITUTE,
                    action: StatusAction::Added,
                });
            }
            MoveUse::TeamStatus(status) => {
                let team = match self.data.target {
                    MoveTarget::OpponentTeam => self.user.id.team.opposite(),
                    _ => self.user.id.team,
                };
                let party = self.field.team(team);
                let settings = self.field.data.settings;
                let full = if *status == TeamStatus::SPIKES {
                    party.spike_count >= settings.max_spikes
                } else if *status == TeamStatus::TOXIC_SPIKES {
                    party.toxic_spike_count >= settings.max_toxic_spikes
                } else {
                    party.status.contains(*status)
                };
                if full {
                    self.result(MoveResult::Failed);
                    return false;
                }
                self.outcomes.push(Outcome::TeamStatus {
                    team,
                    status: *status,
                    action: StatusAction::Added,
                    victim: None,
                });
            }
            MoveUse::Weather(weather) => {
                if self.field.weather == *weather || *weather == Weather::None {
                    self.result(MoveResult::Failed);
                    return false;
                }
                self.outcomes.push(Outcome::Weather {
                    weather: *weather,
                    action: WeatherAction::Added,
                    turns: self.field.data.settings.weather_turns,
                    victim: None,
                });
            }
            MoveUse::Chance(actions, chance) => {
                if self.random.gen_range(0..100) < *chance {
                    self.run(actions, false);
                }
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultError {
    UnknownMove(MoveId),
    /// The move has data but no effect.
    Unimplemented(MoveId),
    NoPokemon(PokemonIndex),
}

impl Error for DefaultError {}

impl Display for DefaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownMove(id) => write!(f, "no engine move for {}", id),
            Self::Unimplemented(id) => write!(f, "{} has no effect implemented", id),
            Self::NoPokemon(id) => write!(f, "no pokemon at {}", id),
        }
    }
}
