//! The `FEAT` command from RFC 2389: lists the extensions beyond RFC 959
//! that this server implements. Clients probe this before relying on SIZE,
//! MDTM or resumed transfers.

use crate::server::controlchan::{
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Feat;

#[async_trait]
impl CommandHandler for Feat {
    #[tracing_attributes::instrument]
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        let features = vec!["Extensions supported:", " SIZE", " MDTM", " REST STREAM", "END"];
        Ok(Reply::new_multiline(ReplyCode::SystemStatus, features))
    }
}
