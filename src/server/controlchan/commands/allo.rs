//! The RFC 959 Allocate (`ALLO`) command
//
// Obsolete on servers that do not pre-allocate storage, but old clients
// still send it before STOR, so it is accepted as a no-op.

use crate::server::controlchan::{
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    #[tracing_attributes::instrument]
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkayNotImplemented, "Allocation not necessary"))
    }
}
