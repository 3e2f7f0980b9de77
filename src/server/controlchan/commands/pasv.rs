//! The RFC 959 Passive (`PASV`) command
//
// This command requests the server-DTP to "listen" on a data
// port (which is not its default data port) and to wait for a
// connection rather than initiate one upon receipt of a
// transfer command. The response to this command includes the
// host and port address this server is listening on.

use crate::server::{
    controlchan::{
        error::ControlChanError,
        handler::{CommandContext, CommandHandler},
        Reply, ReplyCode,
    },
    datachan::DataChanIntent,
};

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use tokio::net::{TcpListener, TcpSocket};

const BIND_RETRIES: u8 = 10;

#[derive(Debug)]
pub struct Pasv;

impl Pasv {
    // Binds a listener on a random port from the configured range, retrying
    // on conflicts. One transfer means one data connection, hence the
    // backlog of 1.
    fn try_port_range(local_ip: IpAddr, passive_ports: RangeInclusive<u16>) -> io::Result<TcpListener> {
        let range_length = u32::from(passive_ports.end() - passive_ports.start()) + 1;

        let mut listener: io::Result<TcpListener> = Err(io::Error::new(io::ErrorKind::InvalidInput, "Bind retries exhausted"));

        for _ in 0..BIND_RETRIES {
            let port = OsRng.next_u32() % range_length + u32::from(*passive_ports.start());
            listener = Self::bind(SocketAddr::new(local_ip, port as u16));
            if listener.is_ok() {
                break;
            }
        }

        listener
    }

    fn bind(addr: SocketAddr) -> io::Result<TcpListener> {
        let socket = TcpSocket::new_v4()?;
        socket.bind(addr)?;
        socket.listen(1)
    }
}

#[async_trait]
impl CommandHandler for Pasv {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        // The advertised octets are those of the local address of the
        // control connection, never the wildcard we may be bound to.
        let conn_addr = match args.local_addr {
            SocketAddr::V4(addr) => addr,
            SocketAddr::V6(_) => {
                return Ok(Reply::new(ReplyCode::ParameterSyntaxError, "Only IPv4 is supported"));
            }
        };

        let listener = Pasv::try_port_range(args.local_addr.ip(), args.passive_ports);

        let listener = match listener {
            Err(_) => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established")),
            Ok(l) => l,
        };

        let port = match listener.local_addr() {
            Ok(addr) => addr.port(),
            Err(_) => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established")),
        };

        let octets = conn_addr.ip().octets();
        let p1 = port >> 8;
        let p2 = port - (p1 * 256);

        {
            let mut session = args.session.lock().await;
            // The client connects whenever it likes; the next transfer
            // command performs the single accept.
            session.data_chan = Some(DataChanIntent::Passive(listener));
        }

        Ok(Reply::new_with_string(
            ReplyCode::EnteringPassiveMode,
            format!(
                "Entering Passive Mode ({},{},{},{},{},{})",
                octets[0], octets[1], octets[2], octets[3], p1, p2
            ),
        ))
    }
}
