use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

/// One end of the link between the battle host and an observer.
pub trait BattleEndpoint<A, B> {
    fn send(&self, message: A) -> Result<(), ConnectionError>;

    fn receive(&self) -> Result<Option<B>, ConnectionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    Disconnected,
}

impl Error for ConnectionError {}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("endpoint disconnected")
    }
}

#[cfg(feature = "mpsc_endpoint")]
pub use mpsc::*;

#[cfg(feature = "mpsc_endpoint")]
mod mpsc {

    use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError, TrySendError};

    use crate::message::{ClientMessage, ServerMessage};

    use super::{BattleEndpoint, ConnectionError};

    pub fn create<A, B>() -> (MpscConnection<A, B>, MpscConnection<B, A>) {
        let (sender, serv_receiver) = unbounded();
        let (serv_sender, receiver) = unbounded();

        (
            MpscConnection { sender, receiver },
            MpscConnection {
                receiver: serv_receiver,
                sender: serv_sender,
            },
        )
    }

    #[derive(Clone)]
    pub struct MpscConnection<A, B> {
        pub sender: Sender<A>,
        pub receiver: Receiver<B>,
    }

    /// The observer's side of a connection.
    pub type MpscClient = MpscConnection<ClientMessage, ServerMessage>;
    /// The host's side of a connection.
    pub type MpscEndpoint = MpscConnection<ServerMessage, ClientMessage>;

    impl<A, B> BattleEndpoint<A, B> for MpscConnection<A, B> {
        fn send(&self, message: A) -> Result<(), ConnectionError> {
            match self.sender.try_send(message) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(..)) => {
                    log::warn!("unbounded channel reported full");
                    Err(ConnectionError::Disconnected)
                }
                Err(TrySendError::Disconnected(..)) => Err(ConnectionError::Disconnected),
            }
        }

        fn receive(&self) -> Result<Option<B>, ConnectionError> {
            match self.receiver.try_recv() {
                Ok(m) => Ok(Some(m)),
                Err(TryRecvError::Empty) => Ok(None),
                Err(TryRecvError::Disconnected) => Err(ConnectionError::Disconnected),
            }
        }
    }

}
