use serde::{Deserialize, Serialize};

use crate::{
    data::FieldPosition,
    error::InvalidArgument,
    moves::MoveId,
    player::PokemonShell,
    pokedex::{Ability, BaseStat, Health, Item, Level, SpeciesId, Stats, PP},
    select::TurnAction,
};

use super::{
    stat::{BattleStat, StatStages},
    status::{Status1, Status2},
    OwnedMove, Moveset, PokemonIndex, PokemonView,
};

/// A creature as the battle authority tracks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlePokemon {
    pub id: PokemonIndex,
    pub species: SpeciesId,
    pub nickname: String,
    pub level: Level,
    pub hp: Health,
    pub max_hp: Health,
    pub stats: Stats,
    pub stages: StatStages,
    pub status1: Status1,
    /// Sleep turns left, or the toxic damage multiplier.
    pub status1_counter: u8,
    pub status2: Status2,
    pub protect_counter: u8,
    pub ability: Option<Ability>,
    pub item: Option<Item>,
    pub position: FieldPosition,
    pub moves: Moveset,
    pub selected_action: Option<TurnAction>,
    pub previous_action: Option<TurnAction>,
}

impl BattlePokemon {
    /// Builds a creature from its roster entry, looking up each move's PP.
    pub fn new(
        id: PokemonIndex,
        shell: PokemonShell,
        num_moves: u8,
        pp: impl Fn(&MoveId) -> Option<PP>,
    ) -> Result<Self, InvalidArgument> {
        if shell.stats.hp == 0 {
            return Err(InvalidArgument::Roster(id, "max hp is zero"));
        }
        if shell.moves.is_empty() || shell.moves.len() > num_moves as usize {
            return Err(InvalidArgument::Roster(id, "bad move count"));
        }
        let moves = shell
            .moves
            .iter()
            .map(|m| {
                pp(m)
                    .map(|pp| OwnedMove::new(*m, pp))
                    .ok_or(InvalidArgument::UnknownMove(*m))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (i, m) in moves.iter().enumerate() {
            if moves[..i].iter().any(|o| o.id == m.id) {
                return Err(InvalidArgument::Roster(id, "duplicate move"));
            }
        }
        Ok(Self {
            id,
            species: shell.species,
            nickname: shell.nickname,
            level: shell.level,
            hp: shell.stats.hp,
            max_hp: shell.stats.hp,
            stats: shell.stats,
            stages: Default::default(),
            status1: Status1::None,
            status1_counter: 0,
            status2: Status2::empty(),
            protect_counter: 0,
            ability: shell.ability,
            item: shell.item,
            position: FieldPosition::None,
            moves: Moveset::new(moves),
            selected_action: None,
            previous_action: None,
        })
    }

    /// A stat with its current stage applied. Accuracy and evasion have no
    /// base value and return zero.
    pub fn stat(&self, stat: BattleStat) -> BaseStat {
        stat.of(&self.stats)
            .map(|base| StatStages::mult(base, self.stages[stat]))
            .unwrap_or_default()
    }

    pub fn percent_hp(&self) -> f32 {
        super::percent(self.hp, self.max_hp)
    }

    /// Forgets everything that does not survive leaving the field.
    pub fn clear_for_switch(&mut self) {
        self.position = FieldPosition::None;
        self.stages.reset();
        self.status2 = Status2::empty();
        self.protect_counter = 0;
        self.selected_action = None;
        if self.status1 == Status1::BadlyPoisoned {
            self.status1_counter = 1;
        }
    }
}

impl PokemonView for BattlePokemon {
    fn id(&self) -> PokemonIndex {
        self.id
    }

    fn hp(&self) -> Health {
        self.hp
    }

    fn max_hp(&self) -> Health {
        self.max_hp
    }

    fn position(&self) -> FieldPosition {
        self.position
    }

    fn status1(&self) -> Status1 {
        self.status1
    }

    fn status2(&self) -> Status2 {
        self.status2
    }

    fn stages(&self) -> &StatStages {
        &self.stages
    }
}
