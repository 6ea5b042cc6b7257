use rand::{seq::IteratorRandom, Rng};

use crate::{
    field::Field,
    moves::MoveTarget,
    pokemon::{BattlePokemon, PokemonIndex},
    select::Target,
};

fn chosen(field: &Field, target: Option<Target>) -> Option<&BattlePokemon> {
    target.and_then(|t| field.at(t.team, t.position))
}

fn opponent(field: &Field, random: &mut impl Rng, user: &BattlePokemon) -> Vec<PokemonIndex> {
    field
        .active_on(user.id.team.opposite())
        .map(|p| p.id)
        .choose(random)
        .into_iter()
        .collect()
}

fn ally(field: &Field, random: &mut impl Rng, user: &BattlePokemon) -> Vec<PokemonIndex> {
    allies(field, user).into_iter().choose(random).into_iter().collect()
}

fn allies(field: &Field, user: &BattlePokemon) -> Vec<PokemonIndex> {
    field
        .active_on(user.id.team)
        .filter(|p| p.id != user.id)
        .map(|p| p.id)
        .collect()
}

/// Creatures a move lands on. A chosen position that has emptied since the
/// action was picked is redirected to another valid target. Moves that
/// affect a whole team or the field target the user.
pub fn create_targets(
    field: &Field,
    random: &mut impl Rng,
    user: &BattlePokemon,
    kind: MoveTarget,
    target: Option<Target>,
) -> Vec<PokemonIndex> {
    match kind {
        MoveTarget::Opponent => match chosen(field, target) {
            Some(p) if p.id != user.id => vec![p.id],
            _ => opponent(field, random, user),
        },
        MoveTarget::Ally => match chosen(field, target) {
            Some(p) if p.id.team == user.id.team && p.id != user.id => vec![p.id],
            _ => ally(field, random, user),
        },
        MoveTarget::AllOpponents => field
            .active_on(user.id.team.opposite())
            .map(|p| p.id)
            .collect(),
        MoveTarget::AllOthers => {
            let mut v = allies(field, user);
            v.extend(field.active_on(user.id.team.opposite()).map(|p| p.id));
            v
        }
        MoveTarget::User | MoveTarget::UserTeam | MoveTarget::OpponentTeam | MoveTarget::All => {
            vec![user.id]
        }
    }
}
