//! The RFC 959 Representation Type (`TYPE`) command
//
// Only ASCII (`A`) and Image (`I`) are accepted, matched case
// insensitively. Either way transfers stay byte transparent; the setting is
// recorded but no CR/LF conversion is performed.

use crate::server::{
    controlchan::{
        error::ControlChanError,
        handler::{CommandContext, CommandHandler},
        Reply, ReplyCode,
    },
    session::TransferType,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Type {
    param: String,
}

impl Type {
    pub fn new(param: String) -> Self {
        Type { param }
    }
}

#[async_trait]
impl CommandHandler for Type {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        match self.param.trim().to_uppercase().as_str() {
            "A" => {
                session.transfer_type = TransferType::Ascii;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to ASCII mode"))
            }
            "I" => {
                session.transfer_type = TransferType::Image;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to Binary mode"))
            }
            _ => Ok(Reply::new(
                ReplyCode::CommandNotImplementedForParameter,
                "Only TYPE A and TYPE I are supported",
            )),
        }
    }
}
