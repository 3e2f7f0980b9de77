//! The RFC 959 Data Port (`PORT`) command
//
// The argument is a HOST-PORT specification for the data port
// to be used in the data connection:
//
//   PORT h1,h2,h3,h4,p1,p2
//
// where h1 is the high order 8 bits of the internet host
// address. The connection itself is dialed when the next
// transfer command runs.

use crate::server::{
    controlchan::{
        error::ControlChanError,
        handler::{CommandContext, CommandHandler},
        Reply, ReplyCode,
    },
    datachan::DataChanIntent,
};
use async_trait::async_trait;
use std::net::SocketAddrV4;

#[derive(Debug)]
pub struct Port {
    addr: SocketAddrV4,
}

impl Port {
    pub fn new(addr: SocketAddrV4) -> Self {
        Port { addr }
    }
}

#[async_trait]
impl CommandHandler for Port {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        // Replaces any earlier PORT or PASV; a pending passive listener is
        // closed by the drop.
        session.data_chan = Some(DataChanIntent::Active(self.addr));
        Ok(Reply::new(ReplyCode::CommandOkay, "PORT command successful"))
    }
}
