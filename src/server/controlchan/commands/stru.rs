//! The RFC 959 File Structure (`STRU`) command

use crate::server::controlchan::{
    command::StruParam,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Stru {
    structure: StruParam,
}

impl Stru {
    pub fn new(structure: StruParam) -> Self {
        Stru { structure }
    }
}

#[async_trait]
impl CommandHandler for Stru {
    #[tracing_attributes::instrument]
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        match self.structure {
            StruParam::File => Ok(Reply::new(ReplyCode::CommandOkay, "File structure selected")),
            _ => Ok(Reply::new(
                ReplyCode::CommandNotImplementedForParameter,
                "Only File structure is supported",
            )),
        }
    }
}
