#![deny(missing_docs)]
//! An FTP server library for Rust
//!
//! The sandftp library is an embeddable, async FTP server implementation that
//! serves a single sandboxed root directory on local storage. It speaks the
//! textual RFC 959 protocol over plain TCP, supports both active (`PORT`) and
//! passive (`PASV`) data channels and resumable transfers via `REST`, and
//! keeps every file operation confined to the configured root.
//!
//! Authentication is pluggable through the [`Authenticator`](auth::Authenticator)
//! trait; the crate ships a concurrent in-memory implementation and an
//! anonymous one.
//!
//! # Quick Start
//!
//! ```no_run
//! use sandftp::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::with_root(std::env::temp_dir())
//!         .greeting("Welcome to my FTP server")
//!         .passive_ports(50000..=65535);
//!
//!     server.listen("127.0.0.1:2121").await.unwrap();
//! }
//! ```

pub mod auth;
pub mod fs;
pub(crate) mod server;

pub use crate::server::ftpserver::{error::ServerError, Server, StopHandle};

/// Type alias to shorten the signatures of boxed error sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
