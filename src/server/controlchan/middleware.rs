use crate::server::controlchan::{error::ControlChanError, Event, Reply};
use async_trait::async_trait;

// Defines the requirements for code that wants to intercept and do something with control channel events.
#[async_trait]
pub trait ControlChanMiddleware: Send + Sync {
    async fn handle(&mut self, e: Event) -> Result<Reply, ControlChanError>;
}
