//! Contains code pertaining to the communication between the data and control channels.

use crate::fs;
use std::fmt;

/// Messages that the data loop sends to the control channel loop.
#[derive(Debug)]
pub enum ControlChanMsg {
    /// Data was successfully sent to the client during a RETR
    SentData {
        /// The number of bytes transferred
        bytes: u64,
    },
    /// We've written the data from the client to disk (STOR or APPE)
    WrittenData {
        /// The number of bytes transferred
        bytes: u64,
    },
    /// Listed the directory successfully
    DirectorySuccessfullyListed,
    /// The transfer failed after the preliminary reply was sent
    TransferFailed(fs::Error),
    /// Quit the client connection
    ExitControlLoop,
}

impl fmt::Display for ControlChanMsg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
