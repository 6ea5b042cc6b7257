use rand::Rng;

use crate::{
    field::Field,
    moves::{Accuracy, MoveCategory, MoveData, MoveFlags, Power},
    party::TeamStatus,
    pokedex::Health,
    pokemon::{
        stat::{BattleStat, StatStages},
        status::{Status1, Status2},
        BattlePokemon,
    },
};

use super::moves::DamageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub damage: Health,
    pub crit: bool,
}

/// Rolls accuracy against the target's evasion.
pub fn throw_move(
    random: &mut impl Rng,
    accuracy: Option<Accuracy>,
    user: &BattlePokemon,
    target: &BattlePokemon,
) -> bool {
    match accuracy {
        None => true,
        Some(accuracy) => {
            let stage = (user.stages[BattleStat::Accuracy] - target.stages[BattleStat::Evasion])
                .clamp(-6, 6);
            let chance = accuracy as f64 * StatStages::accuracy_multiplier(stage);
            (random.gen_range(0..100) as f64) < chance
        }
    }
}

fn crit(random: &mut impl Rng, data: &MoveData) -> bool {
    let odds = match data.flags.contains(MoveFlags::HIGH_CRIT) {
        true => 8,
        false => 16,
    };
    random.gen_range(0..odds) == 0
}

/// Damage of a stat-scaled hit. Screens on the target's side halve it unless
/// the hit is critical.
pub fn scaled(
    random: &mut impl Rng,
    field: &Field,
    category: MoveCategory,
    power: Power,
    crit: bool,
    user: &BattlePokemon,
    target: &BattlePokemon,
) -> Health {
    let (attack, defense, screen) = match category {
        MoveCategory::Physical => (BattleStat::Attack, BattleStat::Defense, TeamStatus::REFLECT),
        MoveCategory::Special => (
            BattleStat::SpAttack,
            BattleStat::SpDefense,
            TeamStatus::LIGHT_SCREEN,
        ),
        MoveCategory::Status => return 0,
    };

    let mut attack = user.stat(attack) as u32;
    if category == MoveCategory::Physical && user.status1 == Status1::Burned {
        attack /= 2;
    }
    let defense = (target.stat(defense) as u32).max(1);

    let level = user.level as u32;
    let mut damage = ((2 * level / 5 + 2) * power as u32 * attack / defense) / 50 + 2;

    if user.status2.contains(Status2::HELPING_HAND) {
        damage = damage * 3 / 2;
    }
    if !crit && field.team(target.id.team).status.contains(screen) {
        damage /= 2;
    }
    if crit {
        damage = damage * 3 / 2;
    }
    damage = damage * random.gen_range(85..=100) / 100;

    damage.clamp(1, Health::MAX as u32) as Health
}

/// Damage dealt by one hit of a move, before the target's HP is consulted.
pub fn move_damage(
    random: &mut impl Rng,
    field: &Field,
    data: &MoveData,
    kind: DamageKind,
    user: &BattlePokemon,
    target: &BattlePokemon,
) -> DamageResult {
    let result = match kind {
        DamageKind::Power => {
            let crit = crit(random, data);
            DamageResult {
                damage: scaled(
                    random,
                    field,
                    data.category,
                    data.power.unwrap_or_default(),
                    crit,
                    user,
                    target,
                ),
                crit,
            }
        }
        DamageKind::Constant(damage) => DamageResult {
            damage,
            crit: false,
        },
        DamageKind::Level => DamageResult {
            damage: user.level as Health,
            crit: false,
        },
    };

    match target.status2.contains(Status2::ENDURING) && result.damage >= target.hp {
        true => DamageResult {
            damage: target.hp.saturating_sub(1),
            ..result
        },
        false => result,
    }
}

/// A fraction of max HP, never less than one.
pub fn fraction(max_hp: Health, denominator: Health) -> Health {
    (max_hp / denominator).max(1)
}
