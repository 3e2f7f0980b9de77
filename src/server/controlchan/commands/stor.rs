//! The RFC 959 Store (`STOR`) command
//
// This command causes the server-DTP to accept the data
// transferred via the data connection and to store the data as
// a file at the server site. If the file specified in the
// pathname exists at the server site, then its contents shall
// be replaced by the data being transferred. A new file is
// created at the server site if the file specified in the
// pathname does not already exist.

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
pub struct Stor {
    path: String,
}

impl Stor {
    pub fn new(path: String) -> Self {
        Stor { path }
    }
}

#[async_trait]
impl CommandHandler for Stor {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        let start_pos = std::mem::take(&mut session.start_pos);
        let intent = session.data_chan.take();

        let host_path = match fs.resolve_for_create(&session.cwd, &self.path).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "STOR target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };

        let intent = match intent {
            Some(intent) => intent,
            None => {
                slog::warn!(logger, "STOR: no data connection established for {:?}", self.path);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established"));
            }
        };
        let socket = match intent.establish().await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "STOR: could not open data connection: {}", err);
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
        tokio::spawn(executor.exec_stor(host_path, start_pos));

        Ok(Reply::new(ReplyCode::FileStatusOkay, "Ready to receive data"))
    }
}
