//! The Modification Time (`MDTM`) command from RFC 3659: replies with the
//! last modification instant of a file as `YYYYMMDDHHMMSS` in UTC.

use crate::server::controlchan::{
    commands::fs_error_reply,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;
use chrono::offset::Utc;
use chrono::DateTime;
use std::sync::Arc;

const RFC3659_TIME: &str = "%Y%m%d%H%M%S";

#[derive(Debug)]
pub struct Mdtm {
    path: String,
}

impl Mdtm {
    pub fn new(path: String) -> Self {
        Mdtm { path }
    }
}

#[async_trait]
impl CommandHandler for Mdtm {
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
            Ok(md) => match md.modified() {
                Ok(mtime) => Ok(Reply::new_with_string(
                    ReplyCode::FileStatus,
                    DateTime::<Utc>::from(mtime).format(RFC3659_TIME).to_string(),
                )),
                Err(err) => {
                    slog::warn!(logger, "Failed to read modification time: {}", err);
                    Ok(Reply::new(ReplyCode::FileError, "Could not read modification time"))
                }
            },
            Err(err) => {
                slog::warn!(logger, "Failed to stat file: {}", err);
                Ok(fs_error_reply(&err))
            }
        }
    }
}
