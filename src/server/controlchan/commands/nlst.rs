//! The RFC 959 Name List (`NLST`) command
//
// Like LIST, but the payload is just the bare entry names, one per line.

use crate::server::{
    controlchan::{
        commands::fs_error_reply,
        error::ControlChanError,
        handler::{CommandContext, CommandHandler},
        Reply, ReplyCode,
    },
    datachan::DataCommandExecutor,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct Nlst {
    path: Option<String>,
}

impl Nlst {
    pub fn new(path: Option<String>) -> Self {
        Nlst { path }
    }
}

#[async_trait]
impl CommandHandler for Nlst {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let intent = session.data_chan.take();
        let arg = self.path.clone().unwrap_or_default();

        let host_path = match fs.resolve(&session.cwd, &arg).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "NLST target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };
        match fs.metadata(&host_path).await {
            Ok(md) if md.is_dir() => {}
            Ok(_) => return Ok(Reply::new(ReplyCode::FileError, "Not a directory")),
            Err(err) => {
                slog::warn!(logger, "NLST target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        }

        let intent = match intent {
            Some(intent) => intent,
            None => {
                slog::warn!(logger, "NLST: no data connection established");
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established"));
            }
        };
        let socket = match intent.establish().await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "NLST: could not open data connection: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection"));
            }
        };

        session.data_busy = true;
        let executor = DataCommandExecutor {
            socket,
            control_msg_tx: args.tx_control_chan.clone(),
            fs,
            logger,
        };
        tokio::spawn(executor.exec_nlst(host_path));

        Ok(Reply::new(ReplyCode::FileStatusOkay, "Sending name list"))
    }
}
