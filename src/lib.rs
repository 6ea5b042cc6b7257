//! Pokemon battle simulation.
//!
//! A [`host::Battle`] is the single authority over a battle. It validates
//! what trainers choose, resolves each turn through a [`engine::BattleEngine`]
//! and records every change as a [`event::BattleEvent`]. Observers receive
//! those events, hidden according to their [`event::Perspective`], and can
//! rebuild what they are allowed to see with a [`client::BattleReplica`].

pub mod data;
pub mod error;
pub mod event;
pub mod field;
pub mod message;
pub mod moves;
pub mod party;
pub mod player;
pub mod pokedex;
pub mod pokemon;
pub mod select;
pub mod snapshot;
pub mod state;

pub mod client;
pub mod endpoint;

#[cfg(feature = "engine")]
pub mod engine;

#[cfg(feature = "host")]
pub mod host;

#[cfg(feature = "default_engine")]
pub mod default_engine;

pub mod prelude {

    #[cfg(feature = "default_engine")]
    pub use crate::default_engine::DefaultEngine;
    #[cfg(feature = "engine")]
    pub use crate::engine::{BattleEngine, Outcome, PreMove};
    #[cfg(feature = "mpsc_endpoint")]
    pub use crate::endpoint::{create, MpscClient, MpscEndpoint};
    #[cfg(feature = "host")]
    pub use crate::host::{Battle, PlayerEndpoint};

    pub use crate::client::BattleReplica;
    pub use crate::data::{BattleData, BattleFormat, BattleSettings, FieldPosition, Weather};
    pub use crate::endpoint::{BattleEndpoint, ConnectionError};
    pub use crate::error::{BattleError, InvalidArgument, ProtocolError};
    pub use crate::event::{BattleEvent, Perspective};
    pub use crate::message::{ClientMessage, ServerMessage};
    pub use crate::moves::MoveId;
    pub use crate::player::{PokemonShell, TeamShell};
    pub use crate::pokemon::{PokemonIndex, PokemonView, Side};
    pub use crate::select::{SwitchIn, Target, TurnAction};
    pub use crate::state::BattleState;
}
