//! The RFC 959 Make Directory (`MKD`) command
//
// This command causes the directory specified in the pathname
// to be created as a directory (if the pathname is absolute)
// or as a subdirectory of the current working directory (if
// the pathname is relative).

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
pub struct Mkd {
    path: String,
}

impl Mkd {
    pub fn new(path: String) -> Self {
        Mkd { path }
    }
}

#[async_trait]
impl CommandHandler for Mkd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let host_path = match fs.resolve_for_create(&session.cwd, &self.path).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "Failed to create directory: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };
        match fs.mkd(&host_path).await {
            Ok(()) => Ok(Reply::new_with_string(
                ReplyCode::DirCreated,
                format!("\"{}\" directory created", join_virtual(&session.cwd, &self.path)),
            )),
            Err(err) => {
                slog::warn!(logger, "Failed to create directory: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
