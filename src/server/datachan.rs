//! Contains code pertaining to the FTP *data* channel

use crate::fs::{self, listing, SandboxFs};
use crate::server::chancomms::ControlChanMsg;
use std::io;
use std::net::{SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::Sender;

// How long a passive listener waits for the client before the transfer is
// failed with 425.
const PASSIVE_ACCEPT_DEADLINE: Duration = Duration::from_secs(30);

/// Where the data connection for the next transfer comes from. Set by PORT
/// (we dial out) or PASV (the client dials in on a listener we already
/// bound). Consumed by the transfer; replaced wholesale by any later PORT or
/// PASV, which closes a pending passive listener by dropping it.
#[derive(Debug)]
pub enum DataChanIntent {
    Active(SocketAddrV4),
    Passive(TcpListener),
}

impl DataChanIntent {
    // Produces the connected data socket: exactly one connect or accept per
    // transfer.
    pub async fn establish(self) -> io::Result<TcpStream> {
        match self {
            DataChanIntent::Active(addr) => TcpStream::connect(SocketAddr::V4(addr)).await,
            DataChanIntent::Passive(listener) => {
                match tokio::time::timeout(PASSIVE_ACCEPT_DEADLINE, listener.accept()).await {
                    Ok(Ok((socket, _remote))) => Ok(socket),
                    Ok(Err(err)) => Err(err),
                    Err(_elapsed) => Err(io::Error::new(io::ErrorKind::TimedOut, "no client connected to the passive listener")),
                }
            }
        }
    }
}

// Runs the payload side of a single transfer on its own task and reports the
// outcome to the control loop, which owns the terminal reply.
#[derive(Debug)]
pub struct DataCommandExecutor {
    pub socket: TcpStream,
    pub control_msg_tx: Sender<ControlChanMsg>,
    pub fs: Arc<SandboxFs>,
    pub logger: slog::Logger,
}

impl DataCommandExecutor {
    #[tracing_attributes::instrument]
    pub async fn exec_retr(mut self, path: PathBuf, start_pos: u64) {
        let result = async {
            let mut file = self.fs.open_read(&path, start_pos).await?;
            let bytes = tokio::io::copy(&mut file, &mut self.socket).await.map_err(fs::Error::from)?;
            self.socket.shutdown().await.map_err(fs::Error::from)?;
            Ok::<u64, fs::Error>(bytes)
        }
        .await;
        let msg = match result {
            Ok(bytes) => ControlChanMsg::SentData { bytes },
            Err(err) => {
                slog::warn!(self.logger, "Error copying streams during RETR: {}", err);
                ControlChanMsg::TransferFailed(err)
            }
        };
        if let Err(err) = self.control_msg_tx.send(msg).await {
            slog::error!(self.logger, "Could not notify control channel of RETR result: {}", err);
        }
    }

    #[tracing_attributes::instrument]
    pub async fn exec_stor(mut self, path: PathBuf, start_pos: u64) {
        let result = async {
            let mut file = self.fs.open_write(&path, start_pos).await?;
            let bytes = tokio::io::copy(&mut self.socket, &mut file).await.map_err(fs::Error::from)?;
            Ok::<u64, fs::Error>(bytes)
        }
        .await;
        self.report_write(result, "STOR").await;
    }

    #[tracing_attributes::instrument]
    pub async fn exec_appe(mut self, path: PathBuf) {
        let result = async {
            let mut file = self.fs.open_append(&path).await?;
            let bytes = tokio::io::copy(&mut self.socket, &mut file).await.map_err(fs::Error::from)?;
            Ok::<u64, fs::Error>(bytes)
        }
        .await;
        self.report_write(result, "APPE").await;
    }

    #[tracing_attributes::instrument]
    pub async fn exec_list(mut self, path: PathBuf) {
        let result = async {
            let entries = self.fs.list(&path).await?;
            let payload = listing::render_listing(&entries);
            self.socket.write_all(payload.as_bytes()).await.map_err(fs::Error::from)?;
            self.socket.shutdown().await.map_err(fs::Error::from)?;
            Ok::<(), fs::Error>(())
        }
        .await;
        self.report_listing(result, "LIST").await;
    }

    #[tracing_attributes::instrument]
    pub async fn exec_nlst(mut self, path: PathBuf) {
        let result = async {
            let entries = self.fs.list(&path).await?;
            let payload = listing::render_names(&entries);
            self.socket.write_all(payload.as_bytes()).await.map_err(fs::Error::from)?;
            self.socket.shutdown().await.map_err(fs::Error::from)?;
            Ok::<(), fs::Error>(())
        }
        .await;
        self.report_listing(result, "NLST").await;
    }

    async fn report_write(self, result: Result<u64, fs::Error>, verb: &str) {
        let msg = match result {
            Ok(bytes) => ControlChanMsg::WrittenData { bytes },
            Err(err) => {
                slog::warn!(self.logger, "Error copying streams during {}: {}", verb, err);
                ControlChanMsg::TransferFailed(err)
            }
        };
        if let Err(err) = self.control_msg_tx.send(msg).await {
            slog::error!(self.logger, "Could not notify control channel of {} result: {}", verb, err);
        }
    }

    async fn report_listing(self, result: Result<(), fs::Error>, verb: &str) {
        let msg = match result {
            Ok(()) => ControlChanMsg::DirectorySuccessfullyListed,
            Err(err) => {
                slog::warn!(self.logger, "Failed to send directory listing during {}: {}", verb, err);
                ControlChanMsg::TransferFailed(err)
            }
        };
        if let Err(err) = self.control_msg_tx.send(msg).await {
            slog::error!(self.logger, "Could not notify control channel of {} result: {}", verb, err);
        }
    }
}
