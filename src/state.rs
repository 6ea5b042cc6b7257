use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// Phase of a battle. `Processing` is only ever held while the authority is
/// inside one of its entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleState {
    WaitingForPlayers,
    ReadyToBegin,
    Processing,
    WaitingForActions,
    ReadyToRunTurn,
    WaitingForSwitchIns,
    Ended,
}

impl Default for BattleState {
    fn default() -> Self {
        Self::WaitingForPlayers
    }
}

impl Display for BattleState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        core::fmt::Debug::fmt(self, f)
    }
}
