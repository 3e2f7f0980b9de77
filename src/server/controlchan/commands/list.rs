//! The RFC 959 List (`LIST`) command
//
// Sends a UNIX `ls -l` style listing of the requested directory (the
// current one when no argument is given) over the data channel.

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
pub struct List {
    path: Option<String>,
}

impl List {
    pub fn new(path: Option<String>) -> Self {
        List { path }
    }
}

#[async_trait]
impl CommandHandler for List {
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
                slog::warn!(logger, "LIST target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        };
        match fs.metadata(&host_path).await {
            Ok(md) if md.is_dir() => {}
            Ok(_) => return Ok(Reply::new(ReplyCode::FileError, "Not a directory")),
            Err(err) => {
                slog::warn!(logger, "LIST target not available: {}", err);
                return Ok(fs_error_reply(&err));
            }
        }

        let intent = match intent {
            Some(intent) => intent,
            None => {
                slog::warn!(logger, "LIST: no data connection established");
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established"));
            }
        };
        let socket = match intent.establish().await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "LIST: could not open data connection: {}", err);
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
        tokio::spawn(executor.exec_list(host_path));

        Ok(Reply::new(ReplyCode::FileStatusOkay, "Sending directory list"))
    }
}
