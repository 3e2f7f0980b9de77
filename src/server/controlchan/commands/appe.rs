//! The RFC 959 Append (`APPE`) command
//
// This command causes the server-DTP to accept the data
// transferred via the data connection and to store the data in
// a file at the server site. If the file specified in the
// pathname exists at the server site, the data shall be
// appended to that file; otherwise the file shall be created.

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
pub struct Appe {
    path: String,
}

impl Appe {
    pub fn new(path: String) -> Self {
        Appe { path }
    }
}

#[async_trait]
impl CommandHandler for Appe {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        // APPE ignores any restart offset, but still discards it.
        session.start_pos = 0;
        let intent = session.data_chan.take();

        let host_path = match fs.resolve_for_create(&session.cwd, &self.path).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "APPE target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };

        let intent = match intent {
            Some(intent) => intent,
            None => {
                slog::warn!(logger, "APPE: no data connection established for {:?}", self.path);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established"));
            }
        };
        let socket = match intent.establish().await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "APPE: could not open data connection: {}", err);
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
        tokio::spawn(executor.exec_appe(host_path));

        Ok(Reply::new(ReplyCode::FileStatusOkay, "Ready to receive data"))
    }
}
