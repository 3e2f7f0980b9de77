//! The Size of File (`SIZE`) command from RFC 3659: replies with the size of
//! a regular file in bytes.

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Size {
    path: String,
}

impl Size {
    pub fn new(path: String) -> Self {
        Size { path }
    }
}

#[async_trait]
impl CommandHandler for Size {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let result = async {
            let host_path = fs.resolve(&session.cwd, &self.path).await?;
            fs.metadata(&host_path).await
        }
        .await;
        match result {
            Ok(md) if md.is_file() => Ok(Reply::new_with_string(ReplyCode::FileStatus, md.len().to_string())),
            Ok(_) => Ok(Reply::new(ReplyCode::FileError, "Not a regular file")),
            Err(err) => {
                slog::warn!(logger, "Failed to stat file: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
