//! The RFC 959 Rename To (`RNTO`) command

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Rnto {
    path: String,
}

impl Rnto {
    pub fn new(path: String) -> Self {
        Rnto { path }
    }
}

#[async_trait]
impl CommandHandler for Rnto {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let reply = match session.rename_from.take() {
            Some(from) => {
                let result = async {
                    let to = fs.resolve_for_create(&session.cwd, &self.path).await?;
                    fs.rename(&from, &to).await
                }
                .await;
                match result {
                    Ok(()) => Reply::new(ReplyCode::FileActionOkay, "Rename successful"),
                    Err(err) => {
                        slog::warn!(logger, "Error renaming: {}", err);
                        fs_error_reply(&err)
                    }
                }
            }
            None => Reply::new(ReplyCode::BadCommandSequence, "Please tell me what file you want to rename first"),
        };
        Ok(reply)
    }
}
