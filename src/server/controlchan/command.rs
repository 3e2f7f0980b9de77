use super::parse_error::{ParseError, Result};

use std::net::{Ipv4Addr, SocketAddrV4};
use std::{fmt, str};

/// The parameter of the `STRU` command. Only the `File` structure is
/// supported by us.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StruParam {
    File,
    Record,
    Page,
}

/// The parameter of the `MODE` command. Only the `Stream` mode is supported
/// by us.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ModeParam {
    Stream,
    Block,
    Compressed,
}

/// The argument of a `PASS` command. Both `Debug` and `Display` render a
/// fixed mask, so a parsed command can travel through session logging
/// without the credential ever reaching a log line.
#[derive(PartialEq, Eq, Clone)]
pub struct Password(String);

impl Password {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Password(secret.into())
    }

    /// The cleartext, for handing to the authenticator and nothing else.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(<masked>)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<masked>")
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    User {
        /// The username to log in with; authentication completes with PASS.
        username: String,
    },
    Pass {
        /// The password belonging to the username given before.
        password: Password,
    },
    Quit,
    Noop,
    Syst,
    Feat,
    Help,
    Allo,
    Stru {
        structure: StruParam,
    },
    Mode {
        mode: ModeParam,
    },
    Type {
        /// The raw representation type argument; interpreted case
        /// insensitively by the handler.
        param: String,
    },
    Pwd,
    Cwd {
        /// The path the client would like to change directory to.
        path: String,
    },
    Cdup,
    Mkd {
        /// The path to the directory the client wants to create.
        path: String,
    },
    Rmd {
        /// The directory to delete, recursively.
        path: String,
    },
    Dele {
        /// The (regular) file to delete.
        path: String,
    },
    Size {
        /// The file whose size is requested.
        path: String,
    },
    Mdtm {
        /// The file whose modification time is requested.
        path: String,
    },
    Rnfr {
        /// The file or directory to be renamed.
        path: String,
    },
    Rnto {
        /// The new name.
        path: String,
    },
    Port {
        /// The client endpoint we dial for the next transfer.
        addr: SocketAddrV4,
    },
    Pasv,
    Rest {
        /// The restart offset for the next RETR or STOR.
        offset: u64,
    },
    Retr {
        /// The path to the file the client would like to retrieve.
        path: String,
    },
    Stor {
        /// The path to the file the client would like to store.
        path: String,
    },
    Appe {
        /// The path to the file the client would like to append to.
        path: String,
    },
    List {
        /// The path of the directory the client wants to list, if given.
        path: Option<String>,
    },
    Nlst {
        /// The path of the directory the client wants to list, if given.
        path: Option<String>,
    },
    /// A verb we do not implement. Dispatch answers it with 502.
    Other {
        command_name: String,
        arguments: String,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Command {
    /// Parse one control channel line into a [`Command`].
    ///
    /// The whole line must be UTF-8 and free of control characters; it is
    /// split into `VERB [ SP argument ]` at the first space only, so
    /// arguments may themselves contain spaces. The verb is matched without
    /// regard to case.
    ///
    /// [`Command`]: ./enum.Command.html
    pub fn parse<T: AsRef<[u8]>>(line: T) -> Result<Command> {
        let line = str::from_utf8(line.as_ref()).map_err(|_| ParseError::InvalidUtf8)?;
        let body = trim_line_ending(line)?;
        reject_control_bytes(body)?;

        let (verb, arg) = match body.split_once(' ') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (body, None),
        };

        let cmd = match verb.to_ascii_uppercase().as_str() {
            "USER" => Command::User { username: required(arg)? },
            // An empty password is legal; some accounts simply have none.
            "PASS" => Command::Pass {
                password: Password::new(arg.unwrap_or_default()),
            },
            "QUIT" => plain(arg, Command::Quit)?,
            "NOOP" => plain(arg, Command::Noop)?,
            "SYST" => plain(arg, Command::Syst)?,
            "FEAT" => plain(arg, Command::Feat)?,
            // HELP may name a topic; there is only one answer anyway.
            "HELP" => Command::Help,
            // ALLO carries an allocation size we have no use for.
            "ALLO" => Command::Allo,
            "STRU" => Command::Stru {
                structure: match required(arg)?.to_ascii_uppercase().as_str() {
                    "F" => StruParam::File,
                    "R" => StruParam::Record,
                    "P" => StruParam::Page,
                    _ => return Err(ParseError::InvalidCommand),
                },
            },
            "MODE" => Command::Mode {
                mode: match required(arg)?.to_ascii_uppercase().as_str() {
                    "S" => ModeParam::Stream,
                    "B" => ModeParam::Block,
                    "C" => ModeParam::Compressed,
                    _ => return Err(ParseError::InvalidCommand),
                },
            },
            "TYPE" => Command::Type { param: required(arg)? },
            "PWD" | "XPWD" => plain(arg, Command::Pwd)?,
            "CWD" | "XCWD" => Command::Cwd { path: required(arg)? },
            "CDUP" => plain(arg, Command::Cdup)?,
            "MKD" | "XMKD" => Command::Mkd { path: required(arg)? },
            "RMD" => Command::Rmd { path: required(arg)? },
            "DELE" => Command::Dele { path: required(arg)? },
            "SIZE" => Command::Size { path: required(arg)? },
            "MDTM" => Command::Mdtm { path: required(arg)? },
            "RNFR" => Command::Rnfr { path: required(arg)? },
            "RNTO" => Command::Rnto { path: required(arg)? },
            "PORT" => Command::Port {
                addr: parse_host_port(&required(arg)?)?,
            },
            "PASV" => plain(arg, Command::Pasv)?,
            "REST" => Command::Rest {
                offset: required(arg)?.parse::<u64>().map_err(|_| ParseError::InvalidCommand)?,
            },
            "RETR" => Command::Retr { path: required(arg)? },
            "STOR" => Command::Stor { path: required(arg)? },
            "APPE" => Command::Appe { path: required(arg)? },
            "LIST" => Command::List { path: listing_target(arg) },
            "NLST" => Command::Nlst {
                path: arg.filter(|a| !a.is_empty()).map(str::to_string),
            },
            other => Command::Other {
                command_name: other.to_string(),
                arguments: arg.unwrap_or_default().to_string(),
            },
        };

        Ok(cmd)
    }
}

// Strips the mandatory trailing newline and an optional carriage return
// before it. Anything else at the end of the line is malformed.
fn trim_line_ending(line: &str) -> Result<&str> {
    let body = line.strip_suffix('\n').ok_or(ParseError::InvalidEol)?;
    Ok(body.strip_suffix('\r').unwrap_or(body))
}

// With the line ending already gone, no control byte has any business being
// left; a stray CR in the middle of a line lands here too.
fn reject_control_bytes(body: &str) -> Result<()> {
    match body.bytes().find(|b| b.is_ascii_control()) {
        Some(token) => Err(ParseError::InvalidToken { token }),
        None => Ok(()),
    }
}

// For verbs that take no argument at all.
fn plain(arg: Option<&str>, cmd: Command) -> Result<Command> {
    match arg {
        None | Some("") => Ok(cmd),
        Some(_) => Err(ParseError::InvalidCommand),
    }
}

// For verbs whose argument must be present and non-empty.
fn required(arg: Option<&str>) -> Result<String> {
    match arg {
        Some(a) if !a.is_empty() => Ok(a.to_string()),
        _ => Err(ParseError::InvalidCommand),
    }
}

// LIST arguments may lead with `ls` style option tokens such as `-la`;
// the target is the first token that is not one.
fn listing_target(arg: Option<&str>) -> Option<String> {
    arg?.split_whitespace().find(|token| !token.starts_with('-')).map(str::to_string)
}

// Parses the six comma separated decimals `h1,h2,h3,h4,p1,p2` of a PORT
// argument; the port is `(p1 << 8) | p2`.
fn parse_host_port(params: &str) -> Result<SocketAddrV4> {
    let mut octets = [0u8; 6];
    let mut count = 0;
    for part in params.split(',') {
        if count == 6 {
            return Err(ParseError::InvalidCommand);
        }
        octets[count] = part.trim().parse::<u8>().map_err(|_| ParseError::InvalidCommand)?;
        count += 1;
    }
    if count != 6 {
        return Err(ParseError::InvalidCommand);
    }
    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = (u16::from(octets[4]) << 8) | u16::from(octets[5]);
    Ok(SocketAddrV4::new(ip, port))
}
