//! The RFC 959 Remove Directory (`RMD`) command
//
// This command causes the directory specified in the pathname to be removed,
// contents included.

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Rmd {
    path: String,
}

impl Rmd {
    pub fn new(path: String) -> Self {
        Rmd { path }
    }
}

#[async_trait]
impl CommandHandler for Rmd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let result = async {
            let host_path = fs.resolve(&session.cwd, &self.path).await?;
            fs.rmd(&host_path).await
        }
        .await;
        match result {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Directory removed")),
            Err(err) => {
                slog::warn!(logger, "Failed to remove directory: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
