//! The RFC 959 Change Working Directory (`CWD`) command
//
// This command allows the user to work with a different
// directory for file storage or retrieval without altering
// login or transfer parameters. The argument is either an
// absolute virtual path or one relative to the current
// directory.

use crate::fs::join_virtual;
use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Cwd {
    path: String,
}

impl Cwd {
    pub fn new(path: String) -> Self {
        Cwd { path }
    }
}

#[async_trait]
impl CommandHandler for Cwd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let host_path = match fs.resolve(&session.cwd, &self.path).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "Failed to change directory: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };
        // The virtual directory is stored in normalized form, so arguments
        // containing `..` that stay inside the sandbox still produce a
        // clean PWD answer.
        let normalized = join_virtual(&session.cwd, &self.path);
        match fs.metadata(&host_path).await {
            Ok(md) if md.is_dir() => {
                session.cwd = normalized;
                Ok(Reply::new(ReplyCode::FileActionOkay, "Directory changed"))
            }
            Ok(_) => Ok(Reply::new(ReplyCode::FileError, "Not a directory")),
            Err(err) => {
                slog::warn!(logger, "Failed to change directory: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
