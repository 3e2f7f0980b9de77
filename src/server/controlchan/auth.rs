use crate::server::{
    controlchan::{error::ControlChanError, middleware::ControlChanMiddleware, Command, Event, Reply, ReplyCode},
    session::{SessionState, SharedSession},
};

use async_trait::async_trait;

// AuthMiddleware ensures the user is authenticated before it can do much else.
pub struct AuthMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    pub session: SharedSession,
    pub next: Next,
}

#[async_trait]
impl<Next> ControlChanMiddleware for AuthMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        match event {
            // Internal messages and the commands needed to get a session
            // authenticated (or to leave politely) are exempt from the check.
            Event::InternalMsg(_)
            | Event::Command(Command::User { .. })
            | Event::Command(Command::Pass { .. })
            | Event::Command(Command::Quit)
            | Event::Command(Command::Noop) => self.next.handle(event).await,
            _ => {
                let session_state = {
                    let session = self.session.lock().await;
                    session.state
                };
                if session_state != SessionState::WaitCmd {
                    Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in"))
                } else {
                    self.next.handle(event).await
                }
            }
        }
    }
}
