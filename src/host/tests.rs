use std::sync::Arc;

use pretty_assertions::assert_eq;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use rstest::rstest;

use crate::{
    client::BattleReplica,
    data::{BattleData, BattleFormat, BattleSettings, FieldPosition, Weather},
    default_engine::DefaultEngine,
    endpoint::{create, BattleEndpoint, MpscClient, MpscEndpoint},
    error::{BattleError, InvalidArgument, ProtocolError},
    event::{BattleEvent, MoveResult, Perspective, WeatherAction},
    message::{ClientMessage, ServerMessage},
    moves::MoveId::{self, *},
    player::{PokemonShell, TeamShell},
    pokedex::{Ability, BaseStat, Health, Item, SpeciesId, Stats},
    pokemon::{
        status::{Status2, StatusAction},
        PokemonIndex, PokemonView, Side,
    },
    select::{SwitchIn, Target, TurnAction},
    state::BattleState,
};

use super::{effective_speed, turn_order, Battle};

fn init() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();
}

fn id(team: Side, index: u8) -> PokemonIndex {
    PokemonIndex::new(team, index)
}

fn shell(nickname: &str, hp: Health, speed: BaseStat, moves: &[MoveId]) -> PokemonShell {
    PokemonShell::new(SpeciesId(1), nickname, 50, Stats::new(hp, 80, 80, 80, 80, speed))
        .with_moves(moves.iter().copied())
}

fn roster(name: &str) -> TeamShell {
    TeamShell::new(
        name,
        vec![
            shell("Pikachu", 120, 110, &[Thunderbolt, QuickAttack, Protect, ThunderWave])
                .with_item(Item::Leftovers),
            shell("Blastoise", 160, 70, &[Surf, IceBeam, Reflect, Recover])
                .with_ability(Ability::RainDish),
            shell("Gengar", 130, 105, &[Hypnosis, ConfuseRay, Substitute, Headbutt]),
            shell("Tyranitar", 170, 55, &[BodySlam, Earthquake, Spikes, Growl])
                .with_ability(Ability::SandStream),
            shell("Ninjask", 110, 120, &[FakeOut, SwordsDance, HelpingHand, Toxic])
                .with_ability(Ability::SpeedBoost),
            shell("Charizard", 140, 95, &[Flamethrower, WillOWisp, LightScreen, ExtremeSpeed]),
        ],
    )
}

fn begin_with(
    data: BattleData,
    home: Vec<PokemonShell>,
    away: Vec<PokemonShell>,
    seed: u64,
) -> (Battle, DefaultEngine, SmallRng) {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(seed);
    let mut battle = Battle::new(
        data,
        &engine,
        TeamShell::new("Red", home),
        TeamShell::new("Blue", away),
    )
    .unwrap();
    battle.begin(&mut random, &engine).unwrap();
    (battle, engine, random)
}

fn begin(
    format: BattleFormat,
    home: Vec<PokemonShell>,
    away: Vec<PokemonShell>,
    seed: u64,
) -> (Battle, DefaultEngine, SmallRng) {
    begin_with(BattleData::new(format), home, away, seed)
}

/// Events from the start of `turn` onwards.
fn turn_events(battle: &Battle, turn: u16) -> &[BattleEvent] {
    let start = battle
        .events()
        .iter()
        .position(|e| *e == BattleEvent::TurnBegan { turn })
        .unwrap();
    &battle.events()[start..]
}

fn position_of(events: &[BattleEvent], f: impl Fn(&BattleEvent) -> bool) -> usize {
    events.iter().position(f).unwrap()
}

/// Picks random usable moves and fills vacancies from the bench until the
/// battle ends or `turns` turns have run. `checkpoint` sees the battle
/// every time it waits for actions.
fn play(
    battle: &mut Battle,
    engine: &DefaultEngine,
    random: &mut SmallRng,
    turns: u16,
    mut checkpoint: impl FnMut(&Battle),
) {
    while battle.state() != BattleState::Ended && battle.turn() < turns {
        match battle.state() {
            BattleState::WaitingForActions => {
                checkpoint(battle);
                for side in Side::BOTH {
                    let actions: Vec<_> = battle
                        .field()
                        .team(side)
                        .actions_required
                        .iter()
                        .map(|id| {
                            let pokemon = battle.field().get(*id).unwrap();
                            let usable: Vec<_> = pokemon
                                .moves
                                .iter()
                                .filter(|m| !m.is_empty())
                                .map(|m| m.id)
                                .collect();
                            (*id, TurnAction::fight(*usable.choose(random).unwrap()))
                        })
                        .collect();
                    battle.select_actions(side, actions).unwrap();
                }
                battle.run_turn(random, engine).unwrap();
            }
            BattleState::WaitingForSwitchIns => {
                for side in Side::BOTH {
                    let format = battle.field().data.format;
                    let team = battle.field().team(side);
                    let bench = team.pokemon.iter().filter(|p| p.can_replace()).map(|p| p.id);
                    let switches: Vec<_> = team
                        .vacant_positions(format)
                        .zip(bench)
                        .map(|(position, pokemon)| SwitchIn::new(pokemon, position))
                        .take(team.switch_ins_required as usize)
                        .collect();
                    if !switches.is_empty() {
                        battle
                            .select_switches(random, engine, side, &switches)
                            .unwrap();
                    }
                }
            }
            state => panic!("battle stuck in {}", state),
        }
    }
}

#[rstest]
#[case(BattleFormat::Single)]
#[case(BattleFormat::Double)]
#[case(BattleFormat::Triple)]
#[case(BattleFormat::Rotation)]
fn leads_fill_every_slot(#[case] format: BattleFormat) {
    let (battle, ..) = begin(format, roster("Red").party, roster("Blue").party, 1);

    assert_eq!(battle.state(), BattleState::WaitingForActions);
    assert_eq!(battle.field().active_battlers.len(), 2 * format.slots());
    for side in Side::BOTH {
        let team = battle.field().team(side);
        assert_eq!(team.num_on_field(), format.slots());
        assert_eq!(team.actions_required.len(), format.slots());

        let mut positions: Vec<_> = team.active_iter().map(|p| p.position).collect();
        let mut legal = format.replacement_order().to_vec();
        positions.sort();
        legal.sort();
        assert_eq!(positions, legal);
    }
}

#[test]
fn short_party_leaves_a_slot_empty() {
    let (battle, ..) = begin(
        BattleFormat::Triple,
        vec![shell("Pidgey", 100, 50, &[Tackle]), shell("Spearow", 100, 60, &[Tackle])],
        roster("Blue").party,
        1,
    );

    assert_eq!(battle.state(), BattleState::WaitingForActions);
    assert_eq!(battle.field().team(Side::Home).num_on_field(), 2);
    assert!(battle
        .field()
        .at(Side::Home, FieldPosition::Right)
        .is_none());
    assert!(!battle
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::SwitchInRequest { .. })));
}

#[test]
fn speed_ties_are_a_coin_flip() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Pidgey", 100, 60, &[Tackle])],
        vec![shell("Rattata", 100, 60, &[Tackle])],
        2,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(Tackle))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Tackle))
        .unwrap();

    let home_first = (0..1000)
        .filter(|_| {
            turn_order(battle.field(), &engine, &mut random).unwrap()[0] == id(Side::Home, 0)
        })
        .count();
    assert!((400..=600).contains(&home_first), "{} of 1000", home_first);

    let orders = |seed| {
        let mut random = SmallRng::seed_from_u64(seed);
        (0..50)
            .map(|_| turn_order(battle.field(), &engine, &mut random).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(orders(17), orders(17));
}

#[test]
fn priority_beats_speed() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Slowpoke", 100, 15, &[QuickAttack, Protect])],
        vec![shell("Jolteon", 100, 130, &[Tackle, ExtremeSpeed])],
        3,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(QuickAttack))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Tackle))
        .unwrap();
    assert_eq!(
        turn_order(battle.field(), &engine, &mut random).unwrap(),
        vec![id(Side::Home, 0), id(Side::Away, 0)]
    );

    battle.run_turn(&mut random, &engine).unwrap();
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(Protect))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(ExtremeSpeed))
        .unwrap();
    battle.run_turn(&mut random, &engine).unwrap();
    assert_eq!(battle.turn_order(), &[id(Side::Home, 0), id(Side::Away, 0)]);
}

#[test]
fn weather_abilities_double_speed() {
    let (battle, ..) = begin(
        BattleFormat::Single,
        vec![shell("Politoed", 100, 70, &[Tackle]).with_ability(Ability::Drizzle)],
        vec![shell("Kingdra", 100, 85, &[Tackle]).with_ability(Ability::SwiftSwim)],
        4,
    );
    let field = battle.field();
    assert_eq!(field.weather, Weather::Rain);
    let kingdra = field.get(id(Side::Away, 0)).unwrap();
    assert_eq!(effective_speed(field, kingdra), 170.0);
}

#[test]
fn switches_go_before_fights() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![
            shell("Slowpoke", 100, 10, &[Tackle]),
            shell("Onix", 100, 70, &[Tackle]),
        ],
        vec![shell("Jolteon", 100, 130, &[QuickAttack])],
        5,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::Switch(id(Side::Home, 1)))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(QuickAttack))
        .unwrap();
    battle.run_turn(&mut random, &engine).unwrap();

    assert_eq!(battle.turn_order(), &[id(Side::Home, 0), id(Side::Away, 0)]);
    let events = turn_events(&battle, 1);
    let out = position_of(events, |e| matches!(e, BattleEvent::SwitchOut { .. }));
    let used = position_of(events, |e| matches!(e, BattleEvent::MoveUsed { .. }));
    assert!(out < used);
    assert!(events.iter().any(
        |e| matches!(e, BattleEvent::HpChanged { pokemon, .. } if *pokemon == id(Side::Home, 1))
    ));
    assert_eq!(
        battle.field().at(Side::Home, FieldPosition::Center).map(|p| p.id),
        Some(id(Side::Home, 1))
    );
}

#[test]
fn last_knockout_ends_without_a_switch_request() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Dratini", 100, 90, &[DragonRage])],
        vec![shell("Magikarp", 30, 20, &[DragonRage])],
        6,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(DragonRage))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(DragonRage))
        .unwrap();
    assert_eq!(battle.state(), BattleState::ReadyToRunTurn);
    battle.run_turn(&mut random, &engine).unwrap();

    assert_eq!(battle.state(), BattleState::Ended);
    assert_eq!(battle.winner(), Some(Side::Home));
    let events = turn_events(&battle, 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, BattleEvent::SwitchInRequest { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, BattleEvent::MoveUsed { user, .. } if user.team == Side::Away)));
    assert_eq!(
        events.last(),
        Some(&BattleEvent::Winner {
            team: Some(Side::Home)
        })
    );
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::fight(DragonRage)),
        Err(BattleError::Protocol(ProtocolError::WrongState {
            actual: BattleState::Ended,
            ..
        }))
    ));
}

#[test]
fn knockout_with_bench_asks_for_a_replacement() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Dratini", 100, 90, &[DragonRage])],
        vec![
            shell("Magikarp", 30, 20, &[Growl]),
            shell("Goldeen", 100, 20, &[Growl]),
        ],
        7,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(DragonRage))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Growl))
        .unwrap();
    battle.run_turn(&mut random, &engine).unwrap();

    assert_eq!(battle.state(), BattleState::WaitingForSwitchIns);
    assert_eq!(battle.winner(), None);
    let requests: Vec<_> = turn_events(&battle, 1)
        .iter()
        .filter(|e| matches!(e, BattleEvent::SwitchInRequest { .. }))
        .cloned()
        .collect();
    assert_eq!(
        requests,
        vec![BattleEvent::SwitchInRequest {
            team: Side::Away,
            amount: 1
        }]
    );

    let goldeen = SwitchIn::new(id(Side::Away, 1), FieldPosition::Center);
    assert!(matches!(
        battle.select_switches(&mut random, &engine, Side::Home, &[]),
        Err(BattleError::Protocol(ProtocolError::NoSwitchInsRequired(
            Side::Home
        )))
    ));
    assert!(matches!(
        battle.select_switches(&mut random, &engine, Side::Away, &[goldeen, goldeen]),
        Err(BattleError::Protocol(ProtocolError::TooManySwitchIns(
            Side::Away
        )))
    ));
    assert!(matches!(
        battle.select_switches(
            &mut random,
            &engine,
            Side::Away,
            &[SwitchIn::new(id(Side::Away, 0), FieldPosition::Center)]
        ),
        Err(BattleError::InvalidArgument(InvalidArgument::CannotSwitchIn(..)))
    ));
    assert!(matches!(
        battle.select_switches(
            &mut random,
            &engine,
            Side::Away,
            &[SwitchIn::new(id(Side::Away, 1), FieldPosition::Left)]
        ),
        Err(BattleError::InvalidArgument(InvalidArgument::IllegalPosition(
            FieldPosition::Left,
            BattleFormat::Single
        )))
    ));

    battle
        .select_switches(&mut random, &engine, Side::Away, &[goldeen])
        .unwrap();
    assert_eq!(battle.state(), BattleState::WaitingForActions);
    assert_eq!(
        battle.field().team(Side::Away).actions_required,
        vec![id(Side::Away, 1)]
    );
}

#[test]
fn doubles_replacements_wait_for_the_next_turn() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Double,
        vec![
            shell("Dratini", 100, 100, &[DragonRage, Growl]),
            shell("Pidgey", 100, 40, &[Growl]),
        ],
        vec![
            shell("Magikarp", 30, 20, &[Growl]),
            shell("Rattata", 100, 30, &[Growl, Tackle]),
            shell("Goldeen", 100, 25, &[Growl]),
        ],
        8,
    );
    battle
        .select_actions(
            Side::Home,
            [
                (
                    id(Side::Home, 0),
                    TurnAction::fight_at(DragonRage, Target::new(Side::Away, FieldPosition::Left)),
                ),
                (id(Side::Home, 1), TurnAction::fight(Growl)),
            ],
        )
        .unwrap();
    battle
        .select_actions(
            Side::Away,
            [
                (id(Side::Away, 0), TurnAction::fight(Growl)),
                (id(Side::Away, 1), TurnAction::Switch(id(Side::Away, 2))),
            ],
        )
        .unwrap();
    battle.run_turn(&mut random, &engine).unwrap();

    assert_eq!(
        battle.turn_order(),
        &[
            id(Side::Away, 1),
            id(Side::Home, 0),
            id(Side::Home, 1),
            id(Side::Away, 0)
        ]
    );
    let events = turn_events(&battle, 1);
    assert!(!events.iter().any(
        |e| matches!(e, BattleEvent::MoveUsed { user, .. } if *user == id(Side::Away, 2) || *user == id(Side::Away, 0))
    ));
    assert!(events.contains(&BattleEvent::Fainted {
        pokemon: id(Side::Away, 0),
        old_position: FieldPosition::Left,
    }));
    assert_eq!(battle.state(), BattleState::WaitingForSwitchIns);

    battle
        .select_switches(
            &mut random,
            &engine,
            Side::Away,
            &[SwitchIn::new(id(Side::Away, 1), FieldPosition::Left)],
        )
        .unwrap();
    assert_eq!(battle.state(), BattleState::WaitingForActions);
    assert_eq!(
        battle.events().last(),
        Some(&BattleEvent::ActionsRequest {
            team: Side::Away,
            pokemon: vec![id(Side::Away, 2), id(Side::Away, 1)],
        })
    );
}

#[test]
fn weather_ends_before_it_deals_damage() {
    let mut data = BattleData::new(BattleFormat::Single);
    data.settings.weather_turns = 2;
    let (mut battle, engine, mut random) = begin_with(
        data,
        vec![shell("Cubone", 160, 50, &[Sandstorm, Growl])],
        vec![shell("Pidgey", 160, 40, &[Growl])],
        9,
    );

    let turn = |battle: &mut Battle, random: &mut SmallRng, home: MoveId| {
        battle
            .select_action(id(Side::Home, 0), TurnAction::fight(home))
            .unwrap();
        battle
            .select_action(id(Side::Away, 0), TurnAction::fight(Growl))
            .unwrap();
        battle.run_turn(random, &engine).unwrap();
    };
    let caused_damage = |e: &BattleEvent| {
        matches!(
            e,
            BattleEvent::Weather {
                action: WeatherAction::CausedDamage,
                ..
            }
        )
    };

    turn(&mut battle, &mut random, Sandstorm);
    assert_eq!(battle.field().weather, Weather::Sandstorm);
    assert_eq!(
        turn_events(&battle, 1)
            .iter()
            .filter(|e| caused_damage(e))
            .count(),
        2
    );

    turn(&mut battle, &mut random, Growl);
    let events = turn_events(&battle, 2);
    assert!(events.contains(&BattleEvent::Weather {
        weather: Weather::Sandstorm,
        action: WeatherAction::Ended,
        victim: None,
    }));
    assert!(!events.iter().any(caused_damage));
    assert_eq!(battle.field().weather, Weather::None);
}

/// Runs one turn where Magikarp uses `move_id` and Rattata growls.
fn guard_turn(
    battle: &mut Battle,
    engine: &DefaultEngine,
    random: &mut SmallRng,
    move_id: MoveId,
) {
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(move_id))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Growl))
        .unwrap();
    battle.run_turn(random, engine).unwrap();
}

fn guard_failed(battle: &Battle) -> bool {
    turn_events(battle, battle.turn()).contains(&BattleEvent::MoveResult {
        user: id(Side::Home, 0),
        target: id(Side::Home, 0),
        result: MoveResult::Failed,
    })
}

fn protect_counter(battle: &Battle) -> u8 {
    battle.field().get(id(Side::Home, 0)).unwrap().protect_counter
}

fn guarding() -> (Battle, DefaultEngine, SmallRng) {
    begin(
        BattleFormat::Single,
        vec![shell("Magikarp", 100, 80, &[Protect, Endure, Growl])],
        vec![shell("Rattata", 100, 40, &[Growl])],
        61,
    )
}

#[test]
fn protection_chains_count_and_reset() {
    let (mut battle, engine, mut random) = guarding();

    guard_turn(&mut battle, &engine, &mut random, Protect);
    assert!(!guard_failed(&battle));
    assert_eq!(protect_counter(&battle), 1);
    let events = turn_events(&battle, 1);
    let added = position_of(events, |e| {
        *e == BattleEvent::Status2 {
            pokemon: id(Side::Home, 0),
            status: Status2::PROTECTED,
            action: StatusAction::Added,
        }
    });
    let ended = position_of(events, |e| {
        *e == BattleEvent::Status2 {
            pokemon: id(Side::Home, 0),
            status: Status2::PROTECTED,
            action: StatusAction::Ended,
        }
    });
    assert!(added < ended);

    guard_turn(&mut battle, &engine, &mut random, Endure);
    let expected = if guard_failed(&battle) { 1 } else { 2 };
    assert_eq!(protect_counter(&battle), expected);

    guard_turn(&mut battle, &engine, &mut random, Growl);
    assert_eq!(protect_counter(&battle), 0);

    guard_turn(&mut battle, &engine, &mut random, Endure);
    assert!(!guard_failed(&battle));
    assert_eq!(protect_counter(&battle), 1);
}

#[test]
fn chained_protection_gets_less_likely() {
    let mut second = 0;
    let mut third = 0;
    for seed in 0..200 {
        let (mut battle, engine, _) = guarding();
        let mut random = SmallRng::seed_from_u64(seed);
        guard_turn(&mut battle, &engine, &mut random, Endure);
        guard_turn(&mut battle, &engine, &mut random, Endure);
        if !guard_failed(&battle) {
            second += 1;
            guard_turn(&mut battle, &engine, &mut random, Protect);
            if !guard_failed(&battle) {
                third += 1;
            }
        }
    }
    assert!((70..=130).contains(&second), "{} of 200", second);
    assert!(third * 4 < second * 3, "{} of {}", third, second);
}

#[test]
fn simultaneous_knockout_is_a_draw() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Larvitar", 1, 40, &[Growl]).with_ability(Ability::SandStream)],
        vec![shell("Pidgey", 1, 50, &[Growl])],
        10,
    );
    assert_eq!(battle.field().weather, Weather::Sandstorm);
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(Growl))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Growl))
        .unwrap();
    battle.run_turn(&mut random, &engine).unwrap();

    assert_eq!(battle.state(), BattleState::Ended);
    assert_eq!(battle.winner(), None);
    assert_eq!(
        battle.events().last(),
        Some(&BattleEvent::Winner { team: None })
    );
}

#[test]
fn out_of_turn_calls_are_rejected() {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(11);
    let team = || TeamShell::new("Red", vec![shell("Pidgey", 100, 50, &[Tackle, Growl])]);

    let bad = BattleData {
        settings: BattleSettings {
            max_party_size: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        Battle::waiting(bad),
        Err(BattleError::InvalidArgument(InvalidArgument::Settings(
            "max_party_size"
        )))
    ));

    let mut battle = Battle::waiting(BattleData::default()).unwrap();
    let crowd = TeamShell::new("Crowd", vec![shell("Pidgey", 100, 50, &[Tackle]); 7]);
    assert!(matches!(
        battle.set_team(Side::Away, crowd, &engine),
        Err(BattleError::InvalidArgument(InvalidArgument::PartySize(
            Side::Away,
            7
        )))
    ));

    battle.set_team(Side::Home, team(), &engine).unwrap();
    assert!(matches!(
        battle.set_team(Side::Home, team(), &engine),
        Err(BattleError::Protocol(ProtocolError::TeamAlreadySet(
            Side::Home
        )))
    ));
    assert!(matches!(
        battle.begin(&mut random, &engine),
        Err(BattleError::Protocol(ProtocolError::WrongState {
            expected: BattleState::ReadyToBegin,
            actual: BattleState::WaitingForPlayers,
        }))
    ));

    battle.set_team(Side::Away, team(), &engine).unwrap();
    assert_eq!(battle.state(), BattleState::ReadyToBegin);
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::fight(Tackle)),
        Err(BattleError::Protocol(ProtocolError::WrongState { .. }))
    ));

    battle.begin(&mut random, &engine).unwrap();
    assert!(matches!(
        battle.run_turn(&mut random, &engine),
        Err(BattleError::Protocol(ProtocolError::WrongState {
            expected: BattleState::ReadyToRunTurn,
            actual: BattleState::WaitingForActions,
        }))
    ));
    assert!(matches!(
        battle.select_switches(&mut random, &engine, Side::Home, &[]),
        Err(BattleError::Protocol(ProtocolError::WrongState { .. }))
    ));
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::fight(Thunderbolt)),
        Err(BattleError::InvalidArgument(InvalidArgument::MoveNotKnown(
            _,
            Thunderbolt
        )))
    ));
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::Switch(id(Side::Home, 0))),
        Err(BattleError::InvalidArgument(InvalidArgument::CannotSwitchIn(..)))
    ));
    assert!(matches!(
        battle.select_actions(Side::Away, [(id(Side::Home, 0), TurnAction::fight(Tackle))]),
        Err(BattleError::Protocol(ProtocolError::ActionNotRequired(..)))
    ));

    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(Tackle))
        .unwrap();
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::fight(Growl)),
        Err(BattleError::Protocol(ProtocolError::ActionNotRequired(..)))
    ));
    assert_eq!(battle.state(), BattleState::WaitingForActions);
}

#[test]
fn engine_errors_stop_the_battle() {
    let (mut battle, engine, mut random) = begin(
        BattleFormat::Single,
        vec![shell("Pidgey", 100, 50, &[Whirlwind])],
        vec![shell("Rattata", 100, 60, &[Growl])],
        12,
    );
    battle
        .select_action(id(Side::Home, 0), TurnAction::fight(Whirlwind))
        .unwrap();
    battle
        .select_action(id(Side::Away, 0), TurnAction::fight(Growl))
        .unwrap();

    assert!(matches!(
        battle.run_turn(&mut random, &engine),
        Err(BattleError::Execution(..))
    ));
    assert_eq!(battle.state(), BattleState::Processing);
    assert!(matches!(
        battle.select_action(id(Side::Home, 0), TurnAction::fight(Whirlwind)),
        Err(BattleError::Protocol(ProtocolError::WrongState {
            actual: BattleState::Processing,
            ..
        }))
    ));
}

#[rstest]
#[case(BattleFormat::Single, 21)]
#[case(BattleFormat::Double, 22)]
#[case(BattleFormat::Triple, 23)]
#[case(BattleFormat::Rotation, 24)]
fn replicas_track_the_host(#[case] format: BattleFormat, #[case] seed: u64) {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(seed);
    let mut battle = Battle::new(
        BattleData::new(format),
        &engine,
        roster("Red"),
        roster("Blue"),
    )
    .unwrap();

    let perspective = Perspective::Spectator {
        hide_non_owned: false,
    };
    let (client, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(perspective, Arc::new(endpoint));
    let mut live = BattleReplica::new(BattleData::default(), perspective);

    battle.begin(&mut random, &engine).unwrap();
    play(&mut battle, &engine, &mut random, 30, |battle| {
        let mut on_field = 0;
        for side in Side::BOTH {
            let team = battle.field().team(side);
            assert!(team.num_on_field() <= format.slots());
            assert!(team.num_on_field() <= team.num_conscious());
            assert!(team.active_iter().all(|p| !p.fainted()));
            on_field += team.num_on_field();
        }
        assert_eq!(battle.field().active_battlers.len(), on_field);

        live.receive(&client).unwrap();
        assert_eq!(live.state(), battle.state());
        assert_eq!(live.turn(), battle.turn());
        assert_eq!(live.snapshot(), battle.snapshot());
    });

    live.receive(&client).unwrap();
    assert_eq!(live.data, battle.field().data);
    assert_eq!(live.state(), battle.state());
    assert_eq!(live.winner(), battle.winner());
    assert_eq!(live.snapshot(), battle.snapshot());

    // Every event is absolute, so applying each one twice changes nothing.
    let mut replayed = BattleReplica::new(BattleData::new(format), perspective);
    for event in battle.events() {
        replayed.apply(event).unwrap();
        replayed.apply(event).unwrap();
    }
    assert_eq!(replayed.snapshot(), battle.snapshot());
}

#[test]
fn same_seed_same_battle() {
    let run = |seed| {
        let (mut battle, engine, mut random) = begin(
            BattleFormat::Double,
            roster("Red").party,
            roster("Blue").party,
            seed,
        );
        play(&mut battle, &engine, &mut random, 20, |_| ());
        battle.events().to_vec()
    };
    assert_eq!(run(31), run(31));
}

#[test]
fn trainers_see_only_their_own_details() {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(41);
    let mut battle = Battle::new(
        BattleData::new(BattleFormat::Single),
        &engine,
        roster("Red"),
        roster("Blue"),
    )
    .unwrap();

    let (client, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(Perspective::Team(Side::Home), Arc::new(endpoint));
    let mut replica = BattleReplica::new(BattleData::default(), Perspective::Team(Side::Home));
    battle.begin(&mut random, &engine).unwrap();

    replica.receive(&client).unwrap();
    let away = replica.team(Side::Away);
    assert_eq!(away.name, "Blue");
    assert_eq!(away.pokemon.len(), 6);
    assert!(away.pokemon[0].known());
    assert!(away.pokemon[1..].iter().all(|p| !p.known()));
    assert_eq!(away.pokemon[0].hp, 0);
    assert!(away.pokemon[0].moves.is_empty());
    assert!(replica.team(Side::Home).pokemon.iter().all(|p| p.known()));

    play(&mut battle, &engine, &mut random, 15, |battle| {
        replica.receive(&client).unwrap();
        assert_eq!(replica.snapshot().teams[0], battle.snapshot().teams[0]);
        for mirror in &replica.team(Side::Away).pokemon {
            let real = battle.field().get(mirror.id).unwrap();
            assert_eq!(mirror.percent, real.percent_hp());
            assert_eq!(mirror.hp, 0);
            assert_eq!(mirror.position, real.position);
        }
    });
}

#[test]
fn trainers_play_through_endpoints() {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(51);
    let mut battle = Battle::new(
        BattleData::new(BattleFormat::Single),
        &engine,
        TeamShell::new("Red", vec![shell("Pidgey", 100, 50, &[Growl])]),
        TeamShell::new("Blue", vec![shell("Rattata", 100, 60, &[Growl])]),
    )
    .unwrap();

    let (home, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(Perspective::Team(Side::Home), Arc::new(endpoint));
    let (away, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(Perspective::Team(Side::Away), Arc::new(endpoint));
    battle.begin(&mut random, &engine).unwrap();

    home.send(ClientMessage::Actions(vec![(
        id(Side::Home, 0),
        TurnAction::fight(Growl),
    )]))
    .unwrap();
    battle.update(&mut random, &engine).unwrap();
    assert_eq!(battle.turn(), 0);
    assert_eq!(battle.state(), BattleState::WaitingForActions);

    away.send(ClientMessage::Actions(vec![(
        id(Side::Away, 0),
        TurnAction::fight(Growl),
    )]))
    .unwrap();
    battle.update(&mut random, &engine).unwrap();
    assert_eq!(battle.turn(), 1);

    let mut replica = BattleReplica::new(BattleData::default(), Perspective::Team(Side::Away));
    replica.receive(&away).unwrap();
    assert_eq!(replica.turn(), 1);
    assert_eq!(replica.state(), BattleState::WaitingForActions);
    assert!(replica.needs_action(id(Side::Away, 0)));

    // A trainer may not act for the other side.
    away.send(ClientMessage::Actions(vec![(
        id(Side::Home, 0),
        TurnAction::fight(Growl),
    )]))
    .unwrap();
    battle.update(&mut random, &engine).unwrap();
    assert_eq!(battle.turn(), 1);
    assert_eq!(
        battle.field().team(Side::Home).actions_required,
        vec![id(Side::Home, 0)]
    );
}

fn last_message(client: &MpscClient) -> Option<ServerMessage> {
    let mut last = None;
    while let Ok(Some(message)) = client.receive() {
        last = Some(message);
    }
    last
}

#[test]
fn rejected_submission_keeps_the_other_trainers() {
    init();
    let engine = DefaultEngine::new();
    let mut random = SmallRng::seed_from_u64(52);
    let mut battle = Battle::new(
        BattleData::new(BattleFormat::Single),
        &engine,
        TeamShell::new("Red", vec![shell("Pidgey", 100, 50, &[Growl])]),
        TeamShell::new("Blue", vec![shell("Rattata", 100, 60, &[Growl])]),
    )
    .unwrap();

    let (home, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(Perspective::Team(Side::Home), Arc::new(endpoint));
    let (away, endpoint): (MpscClient, MpscEndpoint) = create();
    battle.add_observer(Perspective::Team(Side::Away), Arc::new(endpoint));
    battle.begin(&mut random, &engine).unwrap();
    last_message(&home);
    last_message(&away);

    home.send(ClientMessage::Actions(vec![(
        id(Side::Home, 0),
        TurnAction::fight(Tackle),
    )]))
    .unwrap();
    away.send(ClientMessage::Actions(vec![(
        id(Side::Away, 0),
        TurnAction::fight(Growl),
    )]))
    .unwrap();
    battle.update(&mut random, &engine).unwrap();

    assert_eq!(battle.turn(), 0);
    assert_eq!(battle.state(), BattleState::WaitingForActions);
    assert!(battle.field().team(Side::Away).actions_required.is_empty());
    assert_eq!(
        last_message(&home),
        Some(ServerMessage::Event(BattleEvent::ActionsRequest {
            team: Side::Home,
            pokemon: vec![id(Side::Home, 0)],
        }))
    );
    assert_eq!(last_message(&away), None);

    home.send(ClientMessage::Actions(vec![(
        id(Side::Home, 0),
        TurnAction::fight(Growl),
    )]))
    .unwrap();
    battle.update(&mut random, &engine).unwrap();
    assert_eq!(battle.turn(), 1);
}

#[test]
fn action_batches_are_all_or_nothing() {
    let (mut battle, _, _) = begin(
        BattleFormat::Double,
        vec![
            shell("Pidgey", 100, 50, &[Growl]),
            shell("Spearow", 100, 55, &[Growl]),
            shell("Rattata", 100, 60, &[Growl]),
        ],
        vec![
            shell("Magikarp", 100, 20, &[Growl]),
            shell("Goldeen", 100, 25, &[Growl]),
        ],
        53,
    );

    assert!(matches!(
        battle.select_actions(
            Side::Home,
            [
                (id(Side::Home, 0), TurnAction::fight(Growl)),
                (id(Side::Home, 1), TurnAction::fight(Tackle)),
            ],
        ),
        Err(BattleError::InvalidArgument(InvalidArgument::MoveNotKnown(..)))
    ));
    assert!(matches!(
        battle.select_actions(
            Side::Home,
            [
                (id(Side::Home, 0), TurnAction::Switch(id(Side::Home, 2))),
                (id(Side::Home, 1), TurnAction::Switch(id(Side::Home, 2))),
            ],
        ),
        Err(BattleError::InvalidArgument(InvalidArgument::CannotSwitchIn(..)))
    ));
    assert!(matches!(
        battle.select_actions(
            Side::Home,
            [
                (id(Side::Home, 0), TurnAction::fight(Growl)),
                (id(Side::Home, 0), TurnAction::fight(Growl)),
            ],
        ),
        Err(BattleError::Protocol(ProtocolError::ActionNotRequired(..)))
    ));
    assert_eq!(
        battle.field().team(Side::Home).actions_required,
        vec![id(Side::Home, 0), id(Side::Home, 1)]
    );
    assert!(battle
        .field()
        .team(Side::Home)
        .pokemon
        .iter()
        .all(|p| p.selected_action.is_none()));
}
