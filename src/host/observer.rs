use std::sync::Arc;

use crate::{
    endpoint::{BattleEndpoint, ConnectionError},
    event::{BattleEvent, Perspective},
    message::{ClientMessage, ServerMessage},
};

pub type PlayerEndpoint =
    Arc<dyn BattleEndpoint<ServerMessage, ClientMessage> + Send + Sync + 'static>;

/// A connected trainer or spectator.
pub(crate) struct Observer {
    pub perspective: Perspective,
    pub endpoint: PlayerEndpoint,
}

impl Observer {
    pub fn send(&self, message: ServerMessage) -> Result<(), ConnectionError> {
        self.endpoint.send(message)
    }

    /// Sends the form of `event` this observer may see, if any.
    pub fn send_event(&self, event: &BattleEvent) -> Result<(), ConnectionError> {
        match event.for_perspective(self.perspective) {
            Some(event) => self.send(ServerMessage::Event(event)),
            None => Ok(()),
        }
    }

    pub fn receive(&self) -> Result<Option<ClientMessage>, ConnectionError> {
        self.endpoint.receive()
    }
}
