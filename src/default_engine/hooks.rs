//! Effects that do not come from a move: status checks before moving, entry
//! effects and end-of-turn effects.

use rand::Rng;

use crate::{
    data::Weather,
    engine::{Outcome, PreMove},
    event::{ItemAction, WeatherAction},
    field::Field,
    moves::MoveCategory,
    party::TeamStatus,
    pokedex::{Ability, Item},
    pokemon::{
        stat::BattleStat,
        status::{Status1, Status2, StatusAction},
        BattlePokemon,
    },
};

use super::damage::{fraction, scaled};

const CONFUSION_POWER: u8 = 40;

pub fn before_move(random: &mut impl Rng, pokemon: &BattlePokemon, field: &Field) -> PreMove {
    let id = pokemon.id;
    let mut outcomes = Vec::new();

    match pokemon.status1 {
        Status1::Frozen => match random.gen_bool(0.2) {
            true => outcomes.push(Outcome::Status1 {
                target: id,
                status: Status1::Frozen,
                action: StatusAction::Ended,
                counter: 0,
            }),
            false => {
                outcomes.push(Outcome::Status1 {
                    target: id,
                    status: Status1::Frozen,
                    action: StatusAction::CausedImmobility,
                    counter: 0,
                });
                return PreMove::prevented(outcomes);
            }
        },
        Status1::Asleep => match pokemon.status1_counter {
            0 => outcomes.push(Outcome::Status1 {
                target: id,
                status: Status1::Asleep,
                action: StatusAction::Ended,
                counter: 0,
            }),
            turns => {
                outcomes.push(Outcome::Status1 {
                    target: id,
                    status: Status1::Asleep,
                    action: StatusAction::CausedImmobility,
                    counter: turns - 1,
                });
                return PreMove::prevented(outcomes);
            }
        },
        _ => (),
    }

    if pokemon.status2.contains(Status2::FLINCHING) {
        outcomes.push(Outcome::Status2 {
            target: id,
            status: Status2::FLINCHING,
            action: StatusAction::CausedImmobility,
        });
        return PreMove::prevented(outcomes);
    }

    if pokemon.status2.contains(Status2::CONFUSED) {
        if random.gen_bool(0.25) {
            outcomes.push(Outcome::Status2 {
                target: id,
                status: Status2::CONFUSED,
                action: StatusAction::Ended,
            });
        } else {
            outcomes.push(Outcome::Status2 {
                target: id,
                status: Status2::CONFUSED,
                action: StatusAction::Announced,
            });
            if random.gen_bool(0.5) {
                let amount = scaled(
                    random,
                    field,
                    MoveCategory::Physical,
                    CONFUSION_POWER,
                    false,
                    pokemon,
                    pokemon,
                );
                outcomes.push(Outcome::Status2 {
                    target: id,
                    status: Status2::CONFUSED,
                    action: StatusAction::Damage,
                });
                outcomes.push(Outcome::Damage { target: id, amount });
                return PreMove::prevented(outcomes);
            }
        }
    }

    if pokemon.status1 == Status1::Paralyzed && random.gen_bool(0.25) {
        outcomes.push(Outcome::Status1 {
            target: id,
            status: Status1::Paralyzed,
            action: StatusAction::CausedImmobility,
            counter: 0,
        });
        return PreMove::prevented(outcomes);
    }

    PreMove::proceed(outcomes)
}

fn weather_ability(ability: Ability) -> Option<Weather> {
    match ability {
        Ability::Drizzle => Some(Weather::Rain),
        Ability::Drought => Some(Weather::HarshSunlight),
        Ability::SandStream => Some(Weather::Sandstorm),
        Ability::SnowWarning => Some(Weather::Hailstorm),
        _ => None,
    }
}

/// Spikes damage for 1, 2 and 3 layers: 1/8, 1/6 and 1/4 of max HP.
const SPIKES: [u16; 3] = [8, 6, 4];

pub fn switch_in(pokemon: &BattlePokemon, field: &Field) -> Vec<Outcome> {
    let id = pokemon.id;
    let team = field.team(id.team);
    let mut outcomes = Vec::new();

    let guarded = pokemon.ability == Some(Ability::MagicGuard);

    if team.status.contains(TeamStatus::SPIKES) && !guarded {
        let layers = (team.spike_count as usize).clamp(1, SPIKES.len());
        outcomes.push(Outcome::TeamStatus {
            team: id.team,
            status: TeamStatus::SPIKES,
            action: StatusAction::Damage,
            victim: Some(id),
        });
        outcomes.push(Outcome::Damage {
            target: id,
            amount: fraction(pokemon.max_hp, SPIKES[layers - 1]),
        });
    }

    if team.status.contains(TeamStatus::TOXIC_SPIKES)
        && pokemon.status1 == Status1::None
        && pokemon.ability != Some(Ability::Immunity)
    {
        let (status, counter) = match team.toxic_spike_count {
            0 | 1 => (Status1::Poisoned, 0),
            _ => (Status1::BadlyPoisoned, 1),
        };
        outcomes.push(Outcome::Status1 {
            target: id,
            status,
            action: StatusAction::Added,
            counter,
        });
    }

    if let Some(ability) = pokemon.ability {
        if let Some(weather) = weather_ability(ability) {
            if field.weather != weather || field.weather_counter != 0 {
                outcomes.push(Outcome::Ability {
                    pokemon: id,
                    ability,
                });
                outcomes.push(Outcome::Weather {
                    weather,
                    action: WeatherAction::Added,
                    turns: 0,
                    victim: None,
                });
            }
        }
    }

    outcomes
}

pub fn turn_end(pokemon: &BattlePokemon, field: &Field, max_stage: i8) -> Vec<Outcome> {
    let id = pokemon.id;
    let mut outcomes = Vec::new();
    let guarded = pokemon.ability == Some(Ability::MagicGuard);
    let hurt = pokemon.hp < pokemon.max_hp;
    let sixteenth = fraction(pokemon.max_hp, 16);

    match (field.weather, pokemon.ability) {
        (Weather::Rain, Some(ability @ Ability::RainDish))
        | (Weather::Hailstorm, Some(ability @ Ability::IceBody)) => {
            if hurt {
                outcomes.push(Outcome::Ability {
                    pokemon: id,
                    ability,
                });
                outcomes.push(Outcome::Heal {
                    target: id,
                    amount: sixteenth,
                });
            }
        }
        (
            Weather::Sandstorm,
            Some(Ability::SandVeil | Ability::SandRush | Ability::MagicGuard | Ability::Overcoat),
        )
        | (Weather::Hailstorm, Some(Ability::MagicGuard | Ability::Overcoat)) => (),
        (weather @ (Weather::Sandstorm | Weather::Hailstorm), _) => {
            outcomes.push(Outcome::Weather {
                weather,
                action: WeatherAction::CausedDamage,
                turns: 0,
                victim: Some(id),
            });
            outcomes.push(Outcome::Damage {
                target: id,
                amount: sixteenth,
            });
        }
        _ => (),
    }

    if pokemon.item == Some(Item::Leftovers) && hurt {
        outcomes.push(Outcome::Item {
            pokemon: id,
            item: Item::Leftovers,
            action: ItemAction::RestoredHp,
        });
        outcomes.push(Outcome::Heal {
            target: id,
            amount: sixteenth,
        });
    }

    if !guarded {
        let damage = match pokemon.status1 {
            Status1::Burned | Status1::Poisoned => Some((fraction(pokemon.max_hp, 8), 0)),
            Status1::BadlyPoisoned => {
                let counter = pokemon.status1_counter.max(1);
                Some((
                    (sixteenth.saturating_mul(counter as u16)).min(pokemon.max_hp),
                    counter.saturating_add(1),
                ))
            }
            _ => None,
        };
        if let Some((amount, counter)) = damage {
            outcomes.push(Outcome::Status1 {
                target: id,
                status: pokemon.status1,
                action: StatusAction::Damage,
                counter,
            });
            outcomes.push(Outcome::Damage { target: id, amount });
        }
    }

    if pokemon.ability == Some(Ability::SpeedBoost)
        && pokemon.stages.can_change(BattleStat::Speed, 1, max_stage)
    {
        outcomes.push(Outcome::Ability {
            pokemon: id,
            ability: Ability::SpeedBoost,
        });
        outcomes.push(Outcome::StatChange {
            target: id,
            stat: BattleStat::Speed,
            change: 1,
        });
    }

    outcomes
}
