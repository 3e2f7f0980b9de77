//! Restart of Interrupted Transfer (`REST`)
//
// To avoid having to resend an entire file when a transfer broke off, both
// sides need some way to agree on where in the data stream to restart. The
// offset applies to the single RETR or STOR that follows and is consumed by
// it, success or failure.
//
// See also: <https://cr.yp.to/ftp/retr.html>

use crate::server::controlchan::{
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    Reply, ReplyCode,
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Rest {
    offset: u64,
}

impl Rest {
    pub fn new(offset: u64) -> Self {
        Rest { offset }
    }
}

#[async_trait]
impl CommandHandler for Rest {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        session.start_pos = self.offset;
        Ok(Reply::new_with_string(
            ReplyCode::FileActionPending,
            format!("Restart position accepted ({})", self.offset),
        ))
    }
}
