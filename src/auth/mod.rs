#![deny(missing_docs)]
//! Contains the `Authenticator` trait that is used by the `Server` to
//! authenticate users, along with the implementations shipped with this
//! crate.
//!
//! You can define your own implementation to integrate the server with
//! whatever authentication mechanism you need. For example, to define an
//! `Authenticator` that will randomly decide:
//!
//! ```rust
//! use rand::prelude::*;
//! use sandftp::auth::{AuthenticationError, Authenticator};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! struct RandomAuthenticator;
//!
//! #[async_trait]
//! impl Authenticator for RandomAuthenticator {
//!     async fn authenticate(&self, _username: &str, _password: &str) -> Result<(), AuthenticationError> {
//!         if rand::random() {
//!             Ok(())
//!         } else {
//!             Err(AuthenticationError::BadPassword)
//!         }
//!     }
//! }
//! ```

pub mod anonymous;
pub use anonymous::AnonymousAuthenticator;

mod in_memory;
pub use in_memory::InMemoryAuthenticator;

pub(crate) mod spi;
pub use spi::{AuthenticationError, Authenticator};
