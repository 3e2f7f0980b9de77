//! The per-verb command handlers.
//!
//! Each handler is a small unit implementing
//! [`CommandHandler`](super::handler::CommandHandler) over the parsed command
//! and the shared session, which keeps them individually testable.

mod allo;
mod appe;
mod cdup;
mod cwd;
mod dele;
mod feat;
mod help;
mod list;
mod mdtm;
mod mkd;
mod mode;
mod nlst;
mod noop;
mod pass;
mod pasv;
mod port;
mod pwd;
mod quit;
mod rest;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod size;
mod stor;
mod stru;
mod syst;
mod type_;
mod user;

pub(crate) use allo::Allo;
pub(crate) use appe::Appe;
pub(crate) use cdup::Cdup;
pub(crate) use cwd::Cwd;
pub(crate) use dele::Dele;
pub(crate) use feat::Feat;
pub(crate) use help::Help;
pub(crate) use list::List;
pub(crate) use mdtm::Mdtm;
pub(crate) use mkd::Mkd;
pub(crate) use mode::Mode;
pub(crate) use nlst::Nlst;
pub(crate) use noop::Noop;
pub(crate) use pass::Pass;
pub(crate) use pasv::Pasv;
pub(crate) use port::Port;
pub(crate) use pwd::Pwd;
pub(crate) use quit::Quit;
pub(crate) use rest::Rest;
pub(crate) use retr::Retr;
pub(crate) use rmd::Rmd;
pub(crate) use rnfr::Rnfr;
pub(crate) use rnto::Rnto;
pub(crate) use size::Size;
pub(crate) use stor::Stor;
pub(crate) use stru::Stru;
pub(crate) use syst::Syst;
pub(crate) use type_::Type;
pub(crate) use user::User;

use crate::fs;
use crate::server::controlchan::{Reply, ReplyCode};

// Maps a filesystem error onto the one reply the client gets for it. Sandbox
// violations deliberately render as 550 rather than 530 so that clients do
// not enter a re-authentication loop.
pub(crate) fn fs_error_reply(err: &fs::Error) -> Reply {
    let msg = match err.kind() {
        fs::ErrorKind::NotFound => "File or directory not found",
        fs::ErrorKind::PermissionDenied => "Permission denied",
        fs::ErrorKind::SandboxViolation => "Path is outside of the user root",
        fs::ErrorKind::AlreadyExists => "Already exists",
        fs::ErrorKind::NotADirectory => "Not a directory",
        fs::ErrorKind::IsADirectory => "Is a directory",
        fs::ErrorKind::LocalError => "Local error in processing",
    };
    Reply::new(ReplyCode::FileError, msg)
}
