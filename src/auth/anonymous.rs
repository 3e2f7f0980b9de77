//! This module provides an anonymous authenticator

use crate::auth::{AuthenticationError, Authenticator};
use async_trait::async_trait;

/// [`Authenticator`](crate::auth::Authenticator) implementation that simply allows everyone.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use sandftp::auth::{Authenticator, AnonymousAuthenticator};
///
/// let my_auth = AnonymousAuthenticator;
/// assert!(my_auth.authenticate("Finn", "I ❤️ PB").await.is_ok());
/// # }
/// ```
#[derive(Debug)]
pub struct AnonymousAuthenticator;

#[async_trait]
impl Authenticator for AnonymousAuthenticator {
    #[tracing_attributes::instrument]
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<(), AuthenticationError> {
        Ok(())
    }
}
