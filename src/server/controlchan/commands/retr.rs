//! The RFC 959 Retrieve (`RETR`) command
//
// This command causes the server-DTP to transfer a copy of the
// file, specified in the pathname, to the server- or user-DTP
// at the other end of the data connection. The status and
// contents of the file at the server site shall be unaffected.

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
pub struct Retr {
    path: String,
}

impl Retr {
    pub fn new(path: String) -> Self {
        Retr { path }
    }
}

#[async_trait]
impl CommandHandler for Retr {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let fs = Arc::clone(&session.fs);
        let logger = args.logger;

        // Whatever happens next, this command consumes both the restart
        // offset and the data channel intent.
        let start_pos = std::mem::take(&mut session.start_pos);
        let intent = session.data_chan.take();

        let host_path = match fs.resolve(&session.cwd, &self.path).await {
            Ok(path) => path,
            Err(err) => {
                slog::warn!(logger, "RETR target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };
        match fs.metadata(&host_path).await {
            Ok(md) if md.is_file() => {}
            Ok(_) => return Ok(Reply::new(ReplyCode::FileError, "Not a regular file")),
            Err(err) => {
                slog::warn!(logger, "RETR target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        }

        let intent = match intent {
            Some(intent) => intent,
            None => {
                slog::warn!(logger, "RETR: no data connection established for {:?}", self.path);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established"));
            }
        };
        let socket = match intent.establish().await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "RETR: could not open data connection: {}", err);
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
        tokio::spawn(executor.exec_retr(host_path, start_pos));

        Ok(Reply::new(ReplyCode::FileStatusOkay, "Opening data connection"))
    }
}
