use crate::{
    auth::Authenticator,
    server::{
        chancomms::ControlChanMsg,
        controlchan::{command::Command, error::ControlChanError, Reply},
        session::SharedSession,
    },
};
use async_trait::async_trait;
use std::{net::SocketAddr, ops::RangeInclusive, sync::Arc};
use tokio::sync::mpsc::Sender;

// Common interface for all handlers of `Command`s
#[async_trait]
pub(crate) trait CommandHandler: Send + Sync + std::fmt::Debug {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError>;
}

/// Represents arguments passed to a `CommandHandler`
#[derive(Debug)]
pub(crate) struct CommandContext {
    pub parsed_command: Command,
    pub session: SharedSession,
    pub authenticator: Arc<dyn Authenticator>,
    pub passive_ports: RangeInclusive<u16>,
    pub tx_control_chan: Sender<ControlChanMsg>,
    pub local_addr: SocketAddr,
    pub logger: slog::Logger,
}
