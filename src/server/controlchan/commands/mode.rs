//! The RFC 959 Transfer Mode (`MODE`) command

use crate::server::controlchan::{
    command::ModeParam,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Mode {
    mode: ModeParam,
}

impl Mode {
    pub fn new(mode: ModeParam) -> Self {
        Mode { mode }
    }
}

#[async_trait]
impl CommandHandler for Mode {
    #[tracing_attributes::instrument]
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        match self.mode {
            ModeParam::Stream => Ok(Reply::new(ReplyCode::CommandOkay, "Stream mode selected")),
            _ => Ok(Reply::new(
                ReplyCode::CommandNotImplementedForParameter,
                "Only Stream mode is supported",
            )),
        }
    }
}
