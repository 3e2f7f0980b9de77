//! The RFC 959 Delete (`DELE`) command
//
// This command causes the file specified in the pathname to be
// deleted at the server site.

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Dele {
    path: String,
}

impl Dele {
    pub fn new(path: String) -> Self {
        Dele { path }
    }
}

#[async_trait]
impl CommandHandler for Dele {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let result = async {
            let host_path = fs.resolve(&session.cwd, &self.path).await?;
            fs.del(&host_path).await
        }
        .await;
        match result {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "File successfully removed")),
            Err(err) => {
                slog::warn!(logger, "Failed to delete file: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
