use serde::{Deserialize, Serialize};

use crate::{
    data::BattleData,
    event::{BattleEvent, Perspective},
    pokemon::PokemonIndex,
    select::{SwitchIn, TurnAction},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Actions for creatures named in the last actions request.
    Actions(Vec<(PokemonIndex, TurnAction)>),
    /// Replacements for the last switch-in request.
    Switches(Vec<SwitchIn>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Sent once when the observer is registered.
    Join(BattleData, Perspective),
    Event(BattleEvent),
}
