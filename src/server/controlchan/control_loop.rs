use crate::{
    auth::Authenticator,
    fs::SandboxFs,
    server::{
        chancomms::ControlChanMsg,
        controlchan::{
            auth::AuthMiddleware,
            codecs::FtpCodec,
            command::Command,
            commands,
            error::{ControlChanError, ControlChanErrorKind},
            handler::{CommandContext, CommandHandler},
            log::LoggingMiddleware,
            middleware::ControlChanMiddleware,
            Event, Reply, ReplyCode,
        },
        session::{Session, SharedSession},
        shutdown,
    },
};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::{net::SocketAddr, ops::RangeInclusive, sync::Arc, time::Duration};
use tokio::{
    net::TcpStream,
    sync::{
        mpsc::{channel, Receiver, Sender},
        Mutex,
    },
};
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

// Everything the control loop needs to run one session; assembled by the
// accept loop from the server configuration.
#[derive(Clone)]
pub struct Config {
    pub fs: Arc<SandboxFs>,
    pub greeting: &'static str,
    pub authenticator: Arc<dyn Authenticator>,
    pub passive_ports: RangeInclusive<u16>,
    pub idle_session_timeout: Duration,
    pub logger: slog::Logger,
}

/// Does TCP processing when an FTP client connects: sends the welcome banner
/// and then spawns the control channel event loop for the connection.
pub async fn spawn_loop(
    config: Config,
    tcp_stream: TcpStream,
    cancel: CancellationToken,
    guard: shutdown::SessionGuard,
) -> Result<(), ControlChanError> {
    let Config {
        fs,
        greeting,
        authenticator,
        passive_ports,
        idle_session_timeout,
        logger,
    } = config;

    let source: SocketAddr = tcp_stream.peer_addr()?;
    let local_addr: SocketAddr = tcp_stream.local_addr()?;

    // Room for a transfer result plus a QUIT notification without ever
    // blocking a handler on its own control loop.
    let (control_msg_tx, mut control_msg_rx): (Sender<ControlChanMsg>, Receiver<ControlChanMsg>) = channel(8);
    let session: Session = Session::new(fs, source);

    let logger = logger.new(slog::o!("trace-id" => format!("{}", session.trace_id), "source" => format!("{}", source)));

    let shared_session: SharedSession = Arc::new(Mutex::new(session));

    let event_chain = PrimaryEventHandler {
        logger: logger.clone(),
        session: shared_session.clone(),
        authenticator,
        passive_ports,
        tx_control_chan: control_msg_tx,
        local_addr,
    };

    let event_chain = AuthMiddleware {
        session: shared_session.clone(),
        next: event_chain,
    };

    let mut event_chain = LoggingMiddleware {
        logger: logger.clone(),
        sequence_nr: 0,
        next: event_chain,
    };

    let cmd_and_reply_stream = Framed::new(tcp_stream, FtpCodec::new());
    let (mut reply_sink, mut command_source) = cmd_and_reply_stream.split();

    reply_sink.send(Reply::new(ReplyCode::ServiceReady, greeting)).await?;
    reply_sink.flush().await?;

    tokio::spawn(async move {
        // The session stays registered (and counted against the limit)
        // until this task ends.
        let _guard = guard;

        slog::info!(logger, "Starting control loop");
        loop {
            let incoming = {
                let mut incoming = None;
                let mut timeout_delay = Box::pin(tokio::time::sleep(idle_session_timeout));
                tokio::select! {
                    cmd_result = command_source.next() => {
                        match cmd_result {
                            Some(Ok(Ok(cmd))) => incoming = Some(Ok(Event::Command(cmd))),
                            Some(Ok(Err(parse_err))) => incoming = Some(Err(parse_err.into())),
                            Some(Err(err)) => incoming = Some(Err(err)),
                            None => {
                                slog::info!(logger, "Exiting control loop: end of stream");
                                return;
                            }
                        }
                    },
                    Some(msg) = control_msg_rx.recv() => {
                        incoming = Some(Ok(Event::InternalMsg(msg)));
                    },
                    _ = &mut timeout_delay => {
                        let session = shared_session.lock().await;
                        // A running transfer keeps the session alive.
                        if !session.data_busy {
                            incoming = Some(Err(ControlChanError::new(ControlChanErrorKind::ControlChannelTimeout)));
                        }
                    },
                    _ = cancel.cancelled() => {
                        slog::info!(logger, "Shutting down control loop");
                        incoming = Some(Ok(Event::InternalMsg(ControlChanMsg::ExitControlLoop)));
                    }
                };
                incoming
            };
            match incoming {
                // The idle timer fired while a transfer was running.
                None => {}
                Some(Ok(Event::InternalMsg(ControlChanMsg::ExitControlLoop))) => {
                    slog::info!(logger, "Exiting control loop");
                    return;
                }
                Some(Ok(event)) => match event_chain.handle(event).await {
                    Err(e) => {
                        // Handler errors answer the client like any other
                        // protocol error; only socket-level trouble closes
                        // the connection.
                        let (reply, close_connection) = handle_control_channel_error(&logger, e);
                        if reply_sink.send(reply).await.is_err() {
                            slog::warn!(logger, "Could not send error reply to client");
                            return;
                        }
                        if close_connection {
                            return;
                        }
                    }
                    Ok(reply) => {
                        if reply_sink.send(reply).await.is_err() {
                            slog::warn!(logger, "Could not send reply to client");
                            return;
                        }
                    }
                },
                Some(Err(e)) => {
                    let (reply, close_connection) = handle_control_channel_error(&logger, e);
                    if reply_sink.send(reply).await.is_err() {
                        slog::warn!(logger, "Could not send error reply to client");
                        return;
                    }
                    if close_connection {
                        return;
                    }
                }
            }
        }
    });

    Ok(())
}

// Gets the reply to be sent to the client and tells if the connection should be closed.
fn handle_control_channel_error(logger: &slog::Logger, error: ControlChanError) -> (Reply, bool) {
    slog::warn!(logger, "Control channel error: {:?}", error);
    match error.kind() {
        ControlChanErrorKind::Utf8Error | ControlChanErrorKind::InvalidCommand => {
            (Reply::new(ReplyCode::ParameterSyntaxError, "Invalid parameter"), false)
        }
        ControlChanErrorKind::ControlChannelTimeout => (
            Reply::new(ReplyCode::ClosingControlConnection, "Session timed out. Closing control connection"),
            true,
        ),
        _ => (Reply::new(ReplyCode::LocalError, "Unknown internal server error, please try again later"), true),
    }
}

struct PrimaryEventHandler {
    logger: slog::Logger,
    session: SharedSession,
    authenticator: Arc<dyn Authenticator>,
    passive_ports: RangeInclusive<u16>,
    tx_control_chan: Sender<ControlChanMsg>,
    local_addr: SocketAddr,
}

impl PrimaryEventHandler {
    async fn handle_internal_msg(&self, msg: ControlChanMsg) -> Result<Reply, ControlChanError> {
        use ControlChanMsg::*;

        // Any of these marks the end of a transfer: release the idle timer.
        {
            let mut session = self.session.lock().await;
            session.data_busy = false;
        }

        match msg {
            SentData { .. } => Ok(Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete")),
            WrittenData { .. } => Ok(Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete")),
            DirectorySuccessfullyListed => Ok(Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete")),
            TransferFailed(err) => Ok(commands::fs_error_reply(&err)),
            // ExitControlLoop is intercepted by the loop itself before we get here.
            ExitControlLoop => Err(ControlChanError::new(ControlChanErrorKind::IllegalState)),
        }
    }

    async fn handle_command(&self, cmd: Command) -> Result<Reply, ControlChanError> {
        let args = CommandContext {
            parsed_command: cmd.clone(),
            session: self.session.clone(),
            authenticator: self.authenticator.clone(),
            passive_ports: self.passive_ports.clone(),
            tx_control_chan: self.tx_control_chan.clone(),
            local_addr: self.local_addr,
            logger: self.logger.clone(),
        };

        let handler: Box<dyn CommandHandler> = match cmd {
            Command::User { username } => Box::new(commands::User::new(username)),
            Command::Pass { password } => Box::new(commands::Pass::new(password)),
            Command::Quit => Box::new(commands::Quit),
            Command::Noop => Box::new(commands::Noop),
            Command::Syst => Box::new(commands::Syst),
            Command::Feat => Box::new(commands::Feat),
            Command::Help => Box::new(commands::Help),
            Command::Allo => Box::new(commands::Allo),
            Command::Stru { structure } => Box::new(commands::Stru::new(structure)),
            Command::Mode { mode } => Box::new(commands::Mode::new(mode)),
            Command::Type { param } => Box::new(commands::Type::new(param)),
            Command::Pwd => Box::new(commands::Pwd),
            Command::Cwd { path } => Box::new(commands::Cwd::new(path)),
            Command::Cdup => Box::new(commands::Cdup),
            Command::Mkd { path } => Box::new(commands::Mkd::new(path)),
            Command::Rmd { path } => Box::new(commands::Rmd::new(path)),
            Command::Dele { path } => Box::new(commands::Dele::new(path)),
            Command::Size { path } => Box::new(commands::Size::new(path)),
            Command::Mdtm { path } => Box::new(commands::Mdtm::new(path)),
            Command::Rnfr { path } => Box::new(commands::Rnfr::new(path)),
            Command::Rnto { path } => Box::new(commands::Rnto::new(path)),
            Command::Port { addr } => Box::new(commands::Port::new(addr)),
            Command::Pasv => Box::new(commands::Pasv),
            Command::Rest { offset } => Box::new(commands::Rest::new(offset)),
            Command::Retr { path } => Box::new(commands::Retr::new(path)),
            Command::Stor { path } => Box::new(commands::Stor::new(path)),
            Command::Appe { path } => Box::new(commands::Appe::new(path)),
            Command::List { path } => Box::new(commands::List::new(path)),
            Command::Nlst { path } => Box::new(commands::Nlst::new(path)),
            Command::Other { command_name, .. } => {
                return Ok(Reply::new_with_string(
                    ReplyCode::CommandNotImplemented,
                    format!("Command not implemented: {}", command_name),
                ));
            }
        };

        handler.handle(args).await
    }
}

#[async_trait]
impl ControlChanMiddleware for PrimaryEventHandler {
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        match event {
            Event::Command(cmd) => self.handle_command(cmd).await,
            Event::InternalMsg(msg) => self.handle_internal_msg(msg).await,
        }
    }
}
