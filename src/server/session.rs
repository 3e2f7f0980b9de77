//! The session module holds the per-connection protocol state.

use crate::fs::SandboxFs;
use crate::server::datachan::DataChanIntent;
use std::fmt::Formatter;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

// TraceId is an identifier used to correlate log statements together.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct TraceId(u64);

impl TraceId {
    pub fn new() -> Self {
        TraceId(rand::random())
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SessionState {
    New,
    WaitPass,
    WaitCmd,
}

// The representation type set by the TYPE command. Transfers are byte
// transparent either way; the distinction is purely advisory.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TransferType {
    Ascii,
    Image,
}

// The session shared between the control loop and the command handlers
pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

// This is where we keep the state for an FTP session.
#[derive(Debug)]
pub struct Session {
    pub trace_id: TraceId,
    // The remote endpoint of the control connection.
    pub source: SocketAddr,
    pub fs: Arc<SandboxFs>,
    // The username sent with USER. None before USER and after a failed login.
    pub username: Option<String>,
    pub state: SessionState,
    // The virtual working directory: `/` separated, rooted at the sandbox,
    // no trailing slash except for `/` itself.
    pub cwd: String,
    // After an RNFR command this holds the resolved source path for RNTO.
    pub rename_from: Option<PathBuf>,
    // The starting byte offset for the next STOR or RETR, set by REST.
    // Consumed by the transfer that follows, success or failure.
    pub start_pos: u64,
    pub transfer_type: TransferType,
    // Where the next transfer's data connection comes from. Replaced by any
    // PORT or PASV, consumed by the transfer that uses it.
    pub data_chan: Option<DataChanIntent>,
    // True while a transfer task is running, so the idle timer holds off.
    pub data_busy: bool,
}

impl Session {
    pub(super) fn new(fs: Arc<SandboxFs>, source: SocketAddr) -> Self {
        Session {
            trace_id: TraceId::new(),
            source,
            fs,
            username: None,
            state: SessionState::New,
            cwd: "/".to_string(),
            rename_from: None,
            start_pos: 0,
            transfer_type: TransferType::Ascii,
            data_chan: None,
            data_busy: false,
        }
    }
}
