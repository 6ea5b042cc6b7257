use serde::{Deserialize, Serialize};

use crate::{
    data::Weather,
    moves::{MoveCategory, MoveData, MoveFlags, MoveId, MoveTarget},
    party::TeamStatus,
    pokedex::Health,
    pokemon::{
        stat::{BattleStat, Stage},
        status::Status1,
    },
};

use super::EngineMoves;

pub type Percent = u8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMove {
    pub data: MoveData,
    pub usage: MoveExecution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MoveExecution {
    /// Run these against every target that is hit.
    Actions(Vec<MoveUse>),
    /// Placeholder to show that the move does not have a defined use yet.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    /// Scaled from the move's power and the battlers' stats.
    Power,
    Constant(Health),
    /// Equal to the user's level.
    Level,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum MoveUse {
    Damage(DamageKind),
    Status1(Status1),
    Confuse,
    Flinch,
    /// Change a stat of the target, or of the user if `true`.
    Stat(BattleStat, Stage, bool),
    /// Heal a percentage of the target's max HP.
    Heal(Percent),
    Protect,
    Endure,
    /// Boosts the target's damage for the rest of the turn.
    HelpingHand,
    Substitute,
    TeamStatus(TeamStatus),
    Weather(Weather),
    Chance(Vec<Self>, Percent),
}

const DAMAGE: MoveFlags = MoveFlags::BLOCKED_BY_PROTECT;
const CONTACT: MoveFlags = MoveFlags::CONTACT.union(MoveFlags::BLOCKED_BY_PROTECT);

struct Builder(EngineMoves);

impl Builder {
    #[allow(clippy::too_many_arguments)]
    fn add(
        &mut self,
        id: MoveId,
        category: MoveCategory,
        target: MoveTarget,
        priority: i8,
        pp: u8,
        power: Option<u8>,
        accuracy: Option<u8>,
        flags: MoveFlags,
        usage: MoveExecution,
    ) -> &mut Self {
        self.0.insert(
            id,
            EngineMove {
                data: MoveData {
                    priority,
                    pp,
                    category,
                    target,
                    power,
                    accuracy,
                    flags,
                },
                usage,
            },
        );
        self
    }
}

fn actions(uses: impl IntoIterator<Item = MoveUse>) -> MoveExecution {
    MoveExecution::Actions(uses.into_iter().collect())
}

fn hit() -> MoveExecution {
    actions([MoveUse::Damage(DamageKind::Power)])
}

fn hit_and(chance: Percent, secondary: MoveUse) -> MoveExecution {
    actions([
        MoveUse::Damage(DamageKind::Power),
        MoveUse::Chance(vec![secondary], chance),
    ])
}

/// The built-in move table.
pub fn moves() -> EngineMoves {
    use MoveCategory::*;
    use MoveId::*;
    use MoveTarget::*;

    let mut b = Builder(EngineMoves::default());

    b.add(Tackle, Physical, Opponent, 0, 35, Some(50), Some(95), CONTACT, hit())
        .add(QuickAttack, Physical, Opponent, 1, 30, Some(40), Some(100), CONTACT, hit())
        .add(ExtremeSpeed, Physical, Opponent, 2, 5, Some(80), Some(100), CONTACT, hit())
        .add(FakeOut, Physical, Opponent, 3, 10, Some(40), Some(100), CONTACT, hit_and(100, MoveUse::Flinch))
        .add(HelpingHand, Status, Ally, 5, 20, None, None, MoveFlags::empty(), actions([MoveUse::HelpingHand]))
        .add(Protect, Status, User, 4, 10, None, None, MoveFlags::PROTECTION, actions([MoveUse::Protect]))
        .add(Detect, Status, User, 4, 5, None, None, MoveFlags::PROTECTION, actions([MoveUse::Protect]))
        .add(Endure, Status, User, 4, 10, None, None, MoveFlags::PROTECTION, actions([MoveUse::Endure]))
        .add(VitalThrow, Physical, Opponent, -1, 10, Some(70), None, CONTACT, hit())
        .add(Whirlwind, Status, Opponent, -6, 20, None, None, DAMAGE, MoveExecution::None)
        .add(TrickRoom, Status, All, -7, 5, None, None, MoveFlags::empty(), MoveExecution::None)
        .add(Thunderbolt, Special, Opponent, 0, 15, Some(95), Some(100), DAMAGE, hit_and(10, MoveUse::Status1(Status1::Paralyzed)))
        .add(Flamethrower, Special, Opponent, 0, 15, Some(95), Some(100), DAMAGE, hit_and(10, MoveUse::Status1(Status1::Burned)))
        .add(IceBeam, Special, Opponent, 0, 10, Some(95), Some(100), DAMAGE, hit_and(10, MoveUse::Status1(Status1::Frozen)))
        .add(Surf, Special, AllOthers, 0, 15, Some(95), Some(100), DAMAGE, hit())
        .add(Earthquake, Physical, AllOthers, 0, 10, Some(100), Some(100), DAMAGE, hit())
        .add(BodySlam, Physical, Opponent, 0, 15, Some(85), Some(100), CONTACT, hit_and(30, MoveUse::Status1(Status1::Paralyzed)))
        .add(Headbutt, Physical, Opponent, 0, 15, Some(70), Some(100), CONTACT, hit_and(30, MoveUse::Flinch))
        .add(DragonRage, Special, Opponent, 0, 10, None, Some(100), DAMAGE, actions([MoveUse::Damage(DamageKind::Constant(40))]))
        .add(SonicBoom, Special, Opponent, 0, 20, None, Some(90), DAMAGE, actions([MoveUse::Damage(DamageKind::Constant(20))]))
        .add(ThunderWave, Status, Opponent, 0, 20, None, Some(100), DAMAGE, actions([MoveUse::Status1(Status1::Paralyzed)]))
        .add(Toxic, Status, Opponent, 0, 10, None, Some(90), DAMAGE, actions([MoveUse::Status1(Status1::BadlyPoisoned)]))
        .add(WillOWisp, Status, Opponent, 0, 15, None, Some(75), DAMAGE, actions([MoveUse::Status1(Status1::Burned)]))
        .add(Hypnosis, Status, Opponent, 0, 20, None, Some(60), DAMAGE, actions([MoveUse::Status1(Status1::Asleep)]))
        .add(ConfuseRay, Status, Opponent, 0, 10, None, Some(100), DAMAGE, actions([MoveUse::Confuse]))
        .add(SwordsDance, Status, User, 0, 30, None, None, MoveFlags::empty(), actions([MoveUse::Stat(BattleStat::Attack, 2, true)]))
        .add(Agility, Status, User, 0, 30, None, None, MoveFlags::empty(), actions([MoveUse::Stat(BattleStat::Speed, 2, true)]))
        .add(Growl, Status, AllOpponents, 0, 40, None, Some(100), DAMAGE, actions([MoveUse::Stat(BattleStat::Attack, -1, false)]))
        .add(Recover, Status, User, 0, 10, None, None, MoveFlags::empty(), actions([MoveUse::Heal(50)]))
        .add(Substitute, Status, User, 0, 10, None, None, MoveFlags::empty(), actions([MoveUse::Substitute]))
        .add(Reflect, Status, UserTeam, 0, 20, None, None, MoveFlags::empty(), actions([MoveUse::TeamStatus(TeamStatus::REFLECT)]))
        .add(LightScreen, Status, UserTeam, 0, 30, None, None, MoveFlags::empty(), actions([MoveUse::TeamStatus(TeamStatus::LIGHT_SCREEN)]))
        .add(Spikes, Status, OpponentTeam, 0, 20, None, None, MoveFlags::empty(), actions([MoveUse::TeamStatus(TeamStatus::SPIKES)]))
        .add(ToxicSpikes, Status, OpponentTeam, 0, 20, None, None, MoveFlags::empty(), actions([MoveUse::TeamStatus(TeamStatus::TOXIC_SPIKES)]))
        .add(RainDance, Status, All, 0, 5, None, None, MoveFlags::empty(), actions([MoveUse::Weather(Weather::Rain)]))
        .add(SunnyDay, Status, All, 0, 5, None, None, MoveFlags::empty(), actions([MoveUse::Weather(Weather::HarshSunlight)]))
        .add(Sandstorm, Status, All, 0, 10, None, None, MoveFlags::empty(), actions([MoveUse::Weather(Weather::Sandstorm)]))
        .add(Hail, Status, All, 0, 10, None, None, MoveFlags::empty(), actions([MoveUse::Weather(Weather::Hailstorm)]));

    b.0
}
