//! Turn order.

use log::{debug, trace};
use rand::Rng;

use crate::{
    data::Weather,
    engine::BattleEngine,
    error::{BattleError, InvalidArgument},
    field::Field,
    moves::{Priority, MAX_PRIORITY, MIN_PRIORITY},
    pokedex::{Ability, Item, SpeciesId},
    pokemon::{
        stat::{BattleStat, StatStages},
        status::Status1,
        BattlePokemon, PokemonIndex,
    },
    select::TurnAction,
};

/// Speed used to order a bracket: stat stage, then held item, then weather
/// ability, then paralysis.
pub fn effective_speed(field: &Field, pokemon: &BattlePokemon) -> f64 {
    let mut speed =
        pokemon.stats.speed as f64 * StatStages::multiplier(pokemon.stages[BattleStat::Speed]);

    match pokemon.item {
        Some(Item::ChoiceScarf) => speed *= 1.5,
        Some(item) if item.is_power_item() => speed *= 0.5,
        Some(Item::QuickPowder) if pokemon.species == SpeciesId::DITTO => speed *= 2.0,
        _ => (),
    }

    if matches!(
        (field.weather, pokemon.ability),
        (Weather::HarshSunlight, Some(Ability::Chlorophyll))
            | (Weather::Rain, Some(Ability::SwiftSwim))
            | (Weather::Sandstorm, Some(Ability::SandRush))
    ) {
        speed *= 2.0;
    }

    if pokemon.status1 == Status1::Paralyzed {
        speed *= 0.25;
    }

    speed
}

/// Orders every active creature with a selected action. Switches go first
/// in arrival order, then each priority bracket from highest to lowest.
pub fn turn_order(
    field: &Field,
    engine: &impl BattleEngine,
    random: &mut impl Rng,
) -> Result<Vec<PokemonIndex>, BattleError> {
    let mut order = Vec::with_capacity(field.active_battlers.len());

    order.extend(
        field
            .active()
            .filter(|p| matches!(p.selected_action, Some(TurnAction::Switch(..))))
            .map(|p| p.id),
    );

    let mut fighting = Vec::new();
    for pokemon in field.active() {
        if let Some(TurnAction::Fight { move_id, .. }) = pokemon.selected_action {
            let priority = engine
                .get_move(&move_id)
                .ok_or(InvalidArgument::UnknownMove(move_id))?
                .priority;
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
                return Err(BattleError::unreachable(format!(
                    "{} has priority {}",
                    move_id, priority
                )));
            }
            fighting.push((pokemon, priority));
        }
    }

    for priority in (MIN_PRIORITY..=MAX_PRIORITY).rev() {
        let bracket = bracket(field, &fighting, priority, random);
        if !bracket.is_empty() {
            debug!("Priority {} bracket: {:?}", priority, bracket);
        }
        order.extend(bracket);
    }

    Ok(order)
}

fn bracket(
    field: &Field,
    fighting: &[(&BattlePokemon, Priority)],
    priority: Priority,
    random: &mut impl Rng,
) -> Vec<PokemonIndex> {
    let mut bracket: Vec<(PokemonIndex, f64)> = Vec::new();

    for (pokemon, _) in fighting.iter().filter(|(_, p)| *p == priority) {
        let speed = effective_speed(field, pokemon);
        trace!("{} ({}) has {} speed", pokemon.nickname, pokemon.id, speed);
        insert(&mut bracket, pokemon.id, speed, random);
    }

    bracket.into_iter().map(|(id, _)| id).collect()
}

/// A tie lands directly before or after the first equally fast creature on a
/// coin flip; otherwise the creature goes ahead of the first slower one.
fn insert(
    bracket: &mut Vec<(PokemonIndex, f64)>,
    id: PokemonIndex,
    speed: f64,
    random: &mut impl Rng,
) {
    if let Some(tied) = bracket.iter().position(|(_, s)| *s == speed) {
        let index = match random.gen_bool(0.5) {
            true => tied + 1,
            false => tied,
        };
        bracket.insert(index, (id, speed));
    } else if let Some(slower) = bracket.iter().position(|(_, s)| *s < speed) {
        bracket.insert(slower, (id, speed));
    } else {
        bracket.push((id, speed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn id(index: u8) -> PokemonIndex {
        PokemonIndex::new(crate::pokemon::Side::Home, index)
    }

    #[test]
    fn faster_goes_first() {
        let mut random = SmallRng::seed_from_u64(1);
        let mut bracket = Vec::new();
        insert(&mut bracket, id(0), 50.0, &mut random);
        insert(&mut bracket, id(1), 100.0, &mut random);
        insert(&mut bracket, id(2), 75.0, &mut random);
        insert(&mut bracket, id(3), 10.0, &mut random);
        let order: Vec<_> = bracket.into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![id(1), id(2), id(0), id(3)]);
    }

    #[test]
    fn ties_land_next_to_each_other() {
        let mut random = SmallRng::seed_from_u64(7);
        let mut bracket = Vec::new();
        insert(&mut bracket, id(0), 100.0, &mut random);
        insert(&mut bracket, id(1), 50.0, &mut random);
        insert(&mut bracket, id(2), 100.0, &mut random);
        let order: Vec<_> = bracket.iter().map(|(id, _)| *id).collect();
        assert_eq!(order[2], id(1));
        assert!(order[..2].contains(&id(0)) && order[..2].contains(&id(2)));
    }
}
