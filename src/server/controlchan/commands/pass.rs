//! The RFC 959 Password (`PASS`) command
//
// The argument field is a Telnet string specifying the user's
// password. This command must be immediately preceded by the
// user name command, and, for some sites, completes the user's
// identification for access control.

use crate::server::{
    controlchan::{
        command::Password,
        error::ControlChanError,
        handler::{CommandContext, CommandHandler},
        Reply, ReplyCode,
    },
    session::SessionState,
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

// Failed logins are penalized with a delay before the reply, which keeps
// credential guessing slow without tracking state per client.
const FAILED_LOGIN_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug)]
pub struct Pass {
    password: Password,
}

impl Pass {
    pub fn new(password: Password) -> Self {
        Pass { password }
    }
}

#[async_trait]
impl CommandHandler for Pass {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let logger = args.logger;
        match session.state {
            SessionState::WaitPass => {
                let username: String = match session.username.clone() {
                    Some(v) => v,
                    None => {
                        slog::error!(logger, "NoneError for username. This shouldn't happen.");
                        return Ok(Reply::new(ReplyCode::NotLoggedIn, "Please open a new connection to re-authenticate"));
                    }
                };

                match args.authenticator.authenticate(&username, self.password.as_str()).await {
                    Ok(()) => {
                        slog::info!(logger, "User {} logged in", username);
                        session.state = SessionState::WaitCmd;
                        Ok(Reply::new(ReplyCode::UserLoggedIn, "User logged in, proceed"))
                    }
                    Err(err) => {
                        slog::warn!(logger, "Failed login attempt for user {}: {}", username, err);
                        session.username = None;
                        session.state = SessionState::New;
                        sleep(FAILED_LOGIN_DELAY).await;
                        Ok(Reply::new(ReplyCode::NotLoggedIn, "Authentication failed"))
                    }
                }
            }
            SessionState::New => Ok(Reply::new(ReplyCode::BadCommandSequence, "Please supply a username first")),
            _ => Ok(Reply::new(ReplyCode::BadCommandSequence, "Already logged in")),
        }
    }
}
