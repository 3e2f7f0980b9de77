//! The RFC 959 Change To Parent Directory (`CDUP`) command
//
// A special case of CWD: the parent of the current directory becomes the
// current one, and the root is its own parent.

use crate::fs::join_virtual;
use crate::server::controlchan::{
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let parent = join_virtual(&session.cwd, "..");
        session.cwd = parent;
        Ok(Reply::new(ReplyCode::FileActionOkay, "Directory changed"))
    }
}
