//! Contains the `Server` struct that is used to configure and control an FTP
//! server instance, along with everything it needs to run sessions.

pub(crate) mod chancomms;
pub(crate) mod controlchan;
pub(crate) mod datachan;
pub(crate) mod ftpserver;
pub(crate) mod session;
pub(crate) mod shutdown;
