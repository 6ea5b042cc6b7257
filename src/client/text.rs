use crate::{
    data::{FieldPosition, Weather},
    event::{BattleEvent, ItemAction, MoveResult, Perspective, WeatherAction},
    party::TeamStatus,
    pokemon::{
        stat::{BattleStat, Stage},
        status::{Status1, Status2, StatusAction},
        PokemonIndex, Side,
    },
};

use super::BattleReplica;

fn nickname(replica: &BattleReplica, id: PokemonIndex) -> &str {
    replica.get(id).map(|p| p.name()).unwrap_or("???")
}

fn name(replica: &BattleReplica, id: PokemonIndex, caps: bool) -> String {
    let nickname = nickname(replica, id);
    match replica.perspective {
        Perspective::Team(side) if side == id.team => nickname.to_owned(),
        Perspective::Team(..) => match caps {
            true => format!("The foe's {}", nickname),
            false => format!("the foe's {}", nickname),
        },
        Perspective::Spectator { .. } => {
            format!("{}'s {}", replica.team(id.team).name, nickname)
        }
    }
}

fn at(replica: &BattleReplica, side: Side, position: FieldPosition, caps: bool) -> String {
    match replica.at(side, position) {
        Some(pokemon) => name(replica, pokemon.id, caps),
        None => String::from("???"),
    }
}

fn team(replica: &BattleReplica, side: Side, caps: bool) -> String {
    match replica.perspective {
        Perspective::Team(own) if own == side => match caps {
            true => "Your".into(),
            false => "your".into(),
        },
        Perspective::Team(..) => match caps {
            true => "The opposing".into(),
            false => "the opposing".into(),
        },
        Perspective::Spectator { .. } => format!("{}'s", replica.team(side).name),
    }
}

/// "A", "A and B", "A, B and C"
fn andify(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_owned(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

fn stat_name(stat: BattleStat) -> &'static str {
    match stat {
        BattleStat::Attack => "Attack",
        BattleStat::Defense => "Defense",
        BattleStat::SpAttack => "Special Attack",
        BattleStat::SpDefense => "Special Defense",
        BattleStat::Speed => "Speed",
        BattleStat::Accuracy => "Accuracy",
        BattleStat::Evasion => "Evasion",
    }
}

fn stat_change(old: Stage, new: Stage, max: Stage) -> &'static str {
    match new - old {
        -2 => "harshly fell",
        -1 => "fell",
        1 => "rose",
        2 => "rose sharply",
        0 if new <= -max => "won't go lower",
        0 => "won't go higher",
        change if change < 0 => "severely fell",
        _ => "rose drastically",
    }
}

fn status1(status: Status1, action: StatusAction) -> Option<&'static str> {
    use StatusAction::*;
    Some(match (status, action) {
        (Status1::Asleep, Added) => "{0} fell asleep!",
        (Status1::Asleep, CausedImmobility) => "{0} is fast asleep.",
        (Status1::Asleep, Cleared | Ended) => "{0} woke up!",
        (Status1::BadlyPoisoned, Added) => "{0} was badly poisoned!",
        (Status1::Poisoned, Added) => "{0} was poisoned!",
        (Status1::Poisoned | Status1::BadlyPoisoned, Damage) => "{0} was hurt by poison!",
        (Status1::Poisoned | Status1::BadlyPoisoned, Cleared | Ended) => {
            "{0} was cured of its poisoning."
        }
        (Status1::Burned, Added) => "{0} was burned!",
        (Status1::Burned, Damage) => "{0} was hurt by its burn!",
        (Status1::Burned, Cleared | Ended) => "{0}'s burn was healed.",
        (Status1::Frozen, Added) => "{0} was frozen solid!",
        (Status1::Frozen, CausedImmobility) => "{0} is frozen solid!",
        (Status1::Frozen, Cleared | Ended) => "{0} thawed out!",
        (Status1::Paralyzed, Added) => "{0} is paralyzed! It may be unable to move!",
        (Status1::Paralyzed, CausedImmobility) => "{0} is paralyzed! It can't move!",
        (Status1::Paralyzed, Cleared | Ended) => "{0} was cured of paralysis.",
        _ => return None,
    })
}

fn status2(status: Status2, action: StatusAction) -> Option<&'static str> {
    use StatusAction::*;
    Some(match action {
        Added if status == Status2::CONFUSED => "{0} became confused!",
        Announced if status == Status2::CONFUSED => "{0} is confused!",
        Damage if status == Status2::CONFUSED => "It hurt itself in its confusion!",
        Ended | Cleared if status == Status2::CONFUSED => "{0} snapped out of its confusion.",
        CausedImmobility if status == Status2::FLINCHING => "{0} flinched and couldn't move!",
        Added | Damage if status == Status2::PROTECTED => "{0} protected itself!",
        Added if status == Status2::ENDURING => "{0} braced itself!",
        Added if status == Status2::HELPING_HAND => "{0} is being helped!",
        Added if status == Status2::SUBSTITUTE => "{0} put in a substitute!",
        Damage if status == Status2::SUBSTITUTE => "The substitute took damage for {1}!",
        Ended | Cleared if status == Status2::SUBSTITUTE => "{0}'s substitute faded!",
        _ => return None,
    })
}

fn team_status(status: TeamStatus, action: StatusAction) -> Option<&'static str> {
    use StatusAction::*;
    Some(match action {
        Added if status == TeamStatus::REFLECT => "Reflect raised {1} team's Defense!",
        Ended | Cleared if status == TeamStatus::REFLECT => "{0} team's Reflect wore off!",
        Added if status == TeamStatus::LIGHT_SCREEN => {
            "Light Screen raised {1} team's Special Defense!"
        }
        Ended | Cleared if status == TeamStatus::LIGHT_SCREEN => {
            "{0} team's Light Screen wore off!"
        }
        Added if status == TeamStatus::SPIKES => {
            "Spikes were scattered all around the feet of {1} team!"
        }
        Damage if status == TeamStatus::SPIKES => "{2} is hurt by the spikes!",
        Added if status == TeamStatus::TOXIC_SPIKES => {
            "Poison spikes were scattered all around {1} team's feet!"
        }
        Cleared | Ended if status == TeamStatus::TOXIC_SPIKES => {
            "The poison spikes disappeared from around {0} team's feet!"
        }
        _ => return None,
    })
}

fn weather(weather: Weather, action: WeatherAction) -> Option<&'static str> {
    Some(match (weather, action) {
        (Weather::Hailstorm, WeatherAction::Added) => "It started to hail!",
        (Weather::Hailstorm, WeatherAction::CausedDamage) => "{0} is buffeted by the hail!",
        (Weather::Hailstorm, WeatherAction::Ended) => "The hail stopped.",
        (Weather::HarshSunlight, WeatherAction::Added) => "The sunlight turned harsh!",
        (Weather::HarshSunlight, WeatherAction::Ended) => "The sunlight faded.",
        (Weather::Rain, WeatherAction::Added) => "It started to rain!",
        (Weather::Rain, WeatherAction::Ended) => "The rain stopped.",
        (Weather::Sandstorm, WeatherAction::Added) => "A sandstorm kicked up!",
        (Weather::Sandstorm, WeatherAction::CausedDamage) => "{0} is buffeted by the sandstorm!",
        (Weather::Sandstorm, WeatherAction::Ended) => "The sandstorm subsided.",
        _ => return None,
    })
}

fn fill(template: &str, args: &[String]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_owned(), |text, (i, arg)| {
            text.replace(&format!("{{{}}}", i), arg)
        })
}

pub(super) fn describe(replica: &BattleReplica, event: &BattleEvent) -> Option<String> {
    Some(match event {
        BattleEvent::Party { .. }
        | BattleEvent::PartyHidden { .. }
        | BattleEvent::PpChanged { .. }
        | BattleEvent::TurnBegan { .. }
        | BattleEvent::ActionsRequest { .. }
        | BattleEvent::SwitchInRequest { .. } => return None,
        BattleEvent::SwitchIn {
            team, switch_ins, ..
        } => {
            let names: Vec<&str> = switch_ins.iter().map(|s| s.nickname.as_str()).collect();
            format!("{} sent out {}!", replica.team(*team).name, andify(&names))
        }
        BattleEvent::SwitchInHidden {
            team, switch_ins, ..
        } => {
            let names: Vec<&str> = switch_ins.iter().map(|s| s.nickname.as_str()).collect();
            format!("{} sent out {}!", replica.team(*team).name, andify(&names))
        }
        BattleEvent::SwitchOut { pokemon, .. } => format!(
            "{} withdrew {}!",
            replica.team(pokemon.team).name,
            nickname(replica, *pokemon)
        ),
        BattleEvent::SwitchOutHidden {
            team, old_position, ..
        } => format!(
            "{} withdrew {}!",
            replica.team(*team).name,
            replica
                .at(*team, *old_position)
                .map(|p| p.name())
                .unwrap_or("???")
        ),
        BattleEvent::HpChanged {
            pokemon,
            old_hp,
            new_hp,
            old_percent,
            new_percent,
        } => format!(
            "{} {} {} ({:.2}%) HP!",
            name(replica, *pokemon, true),
            match new_hp < old_hp {
                true => "lost",
                false => "restored",
            },
            old_hp.abs_diff(*new_hp),
            (new_percent - old_percent).abs() * 100.0
        ),
        BattleEvent::HpChangedHidden {
            pokemon,
            old_percent,
            new_percent,
        } => format!(
            "{} {} {:.2}% of its HP!",
            name(replica, *pokemon, true),
            match new_percent < old_percent {
                true => "lost",
                false => "restored",
            },
            (new_percent - old_percent).abs() * 100.0
        ),
        BattleEvent::Fainted { pokemon, .. } => {
            format!("{} fainted!", name(replica, *pokemon, true))
        }
        BattleEvent::FaintedHidden { team, old_position } => {
            format!("{} fainted!", at(replica, *team, *old_position, true))
        }
        BattleEvent::MoveUsed { user, move_id } => {
            format!("{} used {}!", name(replica, *user, true), move_id)
        }
        BattleEvent::MoveResult {
            user,
            target,
            result,
        } => {
            let template = match result {
                MoveResult::Missed => {
                    return Some(format!(
                        "{}'s attack missed {}!",
                        name(replica, *user, true),
                        name(replica, *target, false)
                    ))
                }
                MoveResult::NoTarget => "But there was no target...",
                MoveResult::Failed | MoveResult::IneffectiveStatus => "But it failed!",
                MoveResult::IneffectiveAbility => "{0} is protected by its Ability!",
                MoveResult::IneffectiveSubstitute => "{0} is protected by Substitute!",
            };
            fill(template, &[name(replica, *target, true)])
        }
        BattleEvent::MoveCrit { victim } => {
            format!("A critical hit on {}!", name(replica, *victim, false))
        }
        BattleEvent::StatChanged {
            pokemon,
            stat,
            old,
            new,
        } => format!(
            "{}'s {} {}!",
            name(replica, *pokemon, true),
            stat_name(*stat),
            stat_change(*old, *new, replica.data.settings.max_stat_change)
        ),
        BattleEvent::Status1 {
            pokemon,
            status,
            action,
        } => fill(status1(*status, *action)?, &[name(replica, *pokemon, true)]),
        BattleEvent::Status2 {
            pokemon,
            status,
            action,
        } => fill(
            status2(*status, *action)?,
            &[name(replica, *pokemon, true), name(replica, *pokemon, false)],
        ),
        BattleEvent::TeamStatus {
            team: side,
            status,
            action,
            victim,
            ..
        } => {
            let victim = victim
                .map(|v| name(replica, v, true))
                .unwrap_or_default();
            fill(
                team_status(*status, *action)?,
                &[team(replica, *side, true), team(replica, *side, false), victim],
            )
        }
        BattleEvent::Weather {
            weather: w,
            action,
            victim,
        } => {
            let victim = victim
                .map(|v| name(replica, v, true))
                .unwrap_or_default();
            fill(weather(*w, *action)?, &[victim])
        }
        BattleEvent::Ability { pokemon, ability } => format!(
            "{}'s {} activated!",
            name(replica, *pokemon, true),
            ability
        ),
        BattleEvent::Item {
            pokemon,
            item,
            action,
        } => {
            let template = match action {
                ItemAction::RestoredHp => "{0} restored a little HP using its {1}!",
                ItemAction::CausedDamage => "{0} is hurt by its {1}!",
                ItemAction::Announced => "{0}'s {1} activated!",
            };
            fill(template, &[name(replica, *pokemon, true), item.to_string()])
        }
        BattleEvent::Winner { team: Some(side) } => format!(
            "{} defeated {}!",
            replica.team(*side).name,
            replica.team(side.opposite()).name
        ),
        BattleEvent::Winner { team: None } => String::from("The battle ended in a draw!"),
    })
}
