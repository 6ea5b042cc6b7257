use std::{error::Error, sync::Arc};

use pokebattle::{
    pokedex::{Ability, Item, SpeciesId, Stats},
    prelude::*,
};
use rand::{prelude::SeedableRng, rngs::SmallRng, seq::SliceRandom};

const TURNS: u16 = 60;

fn pokemon(species: u16, nickname: &str, stats: Stats, moves: [MoveId; 4]) -> PokemonShell {
    PokemonShell::new(SpeciesId(species), nickname, 50, stats).with_moves(moves)
}

fn team(name: &str) -> TeamShell {
    use MoveId::*;
    TeamShell::new(
        name,
        vec![
            pokemon(25, "Pikachu", Stats::new(110, 75, 60, 70, 70, 110), [Thunderbolt, QuickAttack, ThunderWave, Protect])
                .with_item(Item::Leftovers),
            pokemon(9, "Blastoise", Stats::new(160, 103, 120, 105, 125, 98), [Surf, IceBeam, Reflect, Tackle])
                .with_ability(Ability::RainDish),
            pokemon(94, "Gengar", Stats::new(135, 85, 80, 150, 95, 130), [Hypnosis, ConfuseRay, Substitute, Headbutt]),
            pokemon(248, "Tyranitar", Stats::new(175, 154, 130, 115, 120, 81), [BodySlam, Earthquake, Spikes, Growl])
                .with_ability(Ability::SandStream),
            pokemon(291, "Ninjask", Stats::new(136, 110, 65, 70, 70, 180), [FakeOut, SwordsDance, HelpingHand, Agility])
                .with_ability(Ability::SpeedBoost),
            pokemon(6, "Charizard", Stats::new(153, 104, 98, 129, 105, 120), [Flamethrower, WillOWisp, LightScreen, Tackle]),
        ],
    )
}

fn narrate(replica: &mut BattleReplica, client: &MpscClient) -> Result<(), BattleError> {
    while let Ok(Some(message)) = client.receive() {
        match message {
            ServerMessage::Join(data, perspective) => *replica = BattleReplica::new(data, perspective),
            ServerMessage::Event(event) => {
                if let Some(text) = replica.describe(&event) {
                    println!("{}", text);
                }
                replica.apply(&event)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let mut random = SmallRng::seed_from_u64(23524352);
    let engine = DefaultEngine::new();

    let mut battle = Battle::new(
        BattleData::new(BattleFormat::Double),
        &engine,
        team("Red"),
        team("Blue"),
    )?;

    let perspective = Perspective::Spectator {
        hide_non_owned: false,
    };
    let (client, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(perspective, Arc::new(endpoint));
    let mut replica = BattleReplica::new(BattleData::default(), perspective);

    battle.begin(&mut random, &engine)?;

    while battle.state() != BattleState::Ended && battle.turn() < TURNS {
        narrate(&mut replica, &client)?;
        match battle.state() {
            BattleState::WaitingForActions => {
                for side in Side::BOTH {
                    let mut actions = Vec::new();
                    for id in battle.field().team(side).actions_required.iter() {
                        let pokemon = battle.field().pokemon(*id)?;
                        let usable: Vec<_> = pokemon
                            .moves
                            .iter()
                            .filter(|m| !m.is_empty())
                            .map(|m| m.id)
                            .collect();
                        if let Some(move_id) = usable.choose(&mut random) {
                            actions.push((*id, TurnAction::fight(*move_id)));
                        }
                    }
                    battle.select_actions(side, actions)?;
                }
                if battle.state() != BattleState::ReadyToRunTurn {
                    log::warn!("Someone ran out of moves");
                    break;
                }
                battle.run_turn(&mut random, &engine)?;
            }
            BattleState::WaitingForSwitchIns => {
                let format = battle.field().data.format;
                for side in Side::BOTH {
                    let team = battle.field().team(side);
                    let bench = team
                        .pokemon
                        .iter()
                        .filter(|p| p.can_replace())
                        .map(|p| p.id);
                    let switches: Vec<_> = team
                        .vacant_positions(format)
                        .zip(bench)
                        .map(|(position, pokemon)| SwitchIn::new(pokemon, position))
                        .take(team.switch_ins_required as usize)
                        .collect();
                    if !switches.is_empty() {
                        battle.select_switches(&mut random, &engine, side, &switches)?;
                    }
                }
            }
            _ => break,
        }
    }
    narrate(&mut replica, &client)?;

    log::info!(
        "{} wins!",
        match battle.winner() {
            Some(side) => battle.field().team(side).name.clone(),
            None => "No one".to_owned(),
        }
    );
    Ok(())
}
