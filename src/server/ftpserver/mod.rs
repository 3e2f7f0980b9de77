//! Contains the `Server` that glues the pieces together: it owns the
//! configuration, binds the control port and spawns a session per accepted
//! connection.

pub mod error;

use crate::auth::{AnonymousAuthenticator, Authenticator};
use crate::fs::SandboxFs;
use crate::server::{controlchan, shutdown};
use error::ServerError;
use slog::Drain;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

const DEFAULT_GREETING: &str = "Welcome to the sandftp FTP server";
const DEFAULT_IDLE_SESSION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PASSIVE_PORTS: RangeInclusive<u16> = 49152..=65535;

/// An instance of an FTP server. It serves the configured root directory and
/// consults an [`Authenticator`] for credentials; by default everyone is let
/// in.
///
/// The server can be started with the [`listen`](Server::listen) method.
///
/// # Example
///
/// ```no_run
/// use sandftp::Server;
///
/// #[tokio::main]
/// async fn main() {
///     let server = Server::with_root("/srv/ftp");
///     server.listen("127.0.0.1:2121").await.unwrap();
/// }
/// ```
///
/// [`Authenticator`]: ../auth/trait.Authenticator.html
pub struct Server {
    root: PathBuf,
    greeting: &'static str,
    authenticator: Arc<dyn Authenticator>,
    passive_ports: RangeInclusive<u16>,
    max_sessions: Option<usize>,
    idle_session_timeout: Duration,
    logger: Option<slog::Logger>,
    shutdown: shutdown::Shutdown,
}

impl Server {
    /// Create a new `Server` with the given filesystem root. Nothing outside
    /// of the root will ever be readable or writable through the server.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sandftp::Server;
    ///
    /// let server = Server::with_root("/srv/ftp");
    /// ```
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Server {
            root: root.into(),
            greeting: DEFAULT_GREETING,
            authenticator: Arc::new(AnonymousAuthenticator),
            passive_ports: DEFAULT_PASSIVE_PORTS,
            max_sessions: None,
            idle_session_timeout: Duration::from_secs(DEFAULT_IDLE_SESSION_TIMEOUT_SECS),
            logger: None,
            shutdown: shutdown::Shutdown::new(),
        }
    }

    /// Set the greeting that will be sent to the client after connecting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sandftp::Server;
    ///
    /// // Use it in a builder-like pattern:
    /// let server = Server::with_root("/tmp").greeting("Welcome to my FTP server");
    /// ```
    pub fn greeting(mut self, greeting: &'static str) -> Self {
        self.greeting = greeting;
        self
    }

    /// Set the [`Authenticator`] that will be used for authentication.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sandftp::auth::InMemoryAuthenticator;
    /// use sandftp::Server;
    /// use std::sync::Arc;
    ///
    /// let users = InMemoryAuthenticator::new();
    /// users.add_user("alice", "12345678");
    /// let server = Server::with_root("/tmp").authenticator(Arc::new(users));
    /// ```
    ///
    /// [`Authenticator`]: ../auth/trait.Authenticator.html
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Set the range of ports that we'll use for passive data connections.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sandftp::Server;
    ///
    /// let server = Server::with_root("/tmp").passive_ports(50000..=65535);
    /// ```
    pub fn passive_ports(mut self, range: RangeInclusive<u16>) -> Self {
        self.passive_ports = range;
        self
    }

    /// Cap the number of concurrent sessions. Connections over the limit are
    /// greeted with `421` and closed immediately.
    pub fn max_sessions(mut self, limit: usize) -> Self {
        self.max_sessions = Some(limit);
        self
    }

    /// Set the idle session timeout in seconds. The default is 60 seconds.
    pub fn idle_session_timeout(mut self, secs: u64) -> Self {
        self.idle_session_timeout = Duration::from_secs(secs);
        self
    }

    /// Set the [`slog::Logger`] the server and its sessions log to. Without
    /// one, records are forwarded to the standard `log` crate facade.
    pub fn logger(mut self, logger: Option<slog::Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns a handle with which the running server can later be stopped
    /// gracefully. Obtain it before calling [`listen`](Server::listen).
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Runs the main FTP process asynchronously: binds the control port and
    /// accepts connections until [`StopHandle::stop`] is called. Each
    /// accepted connection becomes an independent session.
    ///
    /// Failing to bind is fatal and returned as an error; errors from
    /// `accept` are logged and the loop continues.
    pub async fn listen<T: Into<String>>(self, bind_address: T) -> Result<(), ServerError> {
        let logger = self
            .logger
            .clone()
            .unwrap_or_else(|| slog::Logger::root(slog_stdlog::StdLog.fuse(), slog::o!()));
        let addr: SocketAddr = bind_address.into().parse()?;
        let fs = Arc::new(SandboxFs::new(&self.root)?);
        let listener = TcpListener::bind(addr).await?;

        slog::info!(logger, "Listening on {}", addr; "root" => fs.root().display().to_string());

        let cancel = self.shutdown.cancel_token();
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((tcp_stream, socket_addr)) => {
                            slog::info!(logger, "Incoming control connection from {:?}", socket_addr);
                            let guard = match self.shutdown.try_register(self.max_sessions) {
                                Some(guard) => guard,
                                None => {
                                    slog::warn!(logger, "Refusing connection from {:?}: session limit reached", socket_addr);
                                    refuse(tcp_stream).await;
                                    continue;
                                }
                            };
                            let config = controlchan::Config {
                                fs: Arc::clone(&fs),
                                greeting: self.greeting,
                                authenticator: Arc::clone(&self.authenticator),
                                passive_ports: self.passive_ports.clone(),
                                idle_session_timeout: self.idle_session_timeout,
                                logger: logger.clone(),
                            };
                            let result = controlchan::spawn_loop(config, tcp_stream, self.shutdown.cancel_token(), guard).await;
                            if let Err(err) = result {
                                slog::error!(logger, "Could not spawn control channel loop for connection from {:?}: {:?}", socket_addr, err);
                            }
                        }
                        Err(err) => {
                            slog::error!(logger, "Error accepting incoming control connection {:?}", err);
                        }
                    }
                },
                _ = cancel.cancelled() => {
                    slog::info!(logger, "Shutting down listener");
                    return Ok(());
                }
            }
        }
    }
}

// Best-effort refusal when the session limit has been reached.
async fn refuse(mut tcp_stream: tokio::net::TcpStream) {
    let _ = tcp_stream.write_all(b"421 Too many connections, try again later\r\n").await;
    let _ = tcp_stream.shutdown().await;
}

/// Handle for gracefully stopping a running [`Server`].
pub struct StopHandle {
    shutdown: shutdown::Shutdown,
}

impl StopHandle {
    /// Asks the accept loop and every active session to finish up, then
    /// waits until they all have. Running transfers are aborted by closing
    /// their sockets.
    pub async fn stop(self) {
        self.shutdown.stop().await;
    }
}
