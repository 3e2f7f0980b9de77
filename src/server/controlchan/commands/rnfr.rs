//! The RFC 959 Rename From (`RNFR`) command

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Rnfr {
    path: String,
}

impl Rnfr {
    pub fn new(path: String) -> Self {
        Rnfr { path }
    }
}

#[async_trait]
impl CommandHandler for Rnfr {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        // The source must exist, file or directory; resolving also proves it.
        match fs.resolve(&session.cwd, &self.path).await {
            Ok(host_path) => {
                session.rename_from = Some(host_path);
                Ok(Reply::new(ReplyCode::FileActionPending, "Tell me, what would you like the new name to be?"))
            }
            Err(err) => {
                slog::warn!(logger, "RNFR source not available: {}", err);
                session.rename_from = None;
                Ok(fs_error_reply(&err))
            }
        }
    }
}
