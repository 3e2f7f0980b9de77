//! The service provider interface (SPI) for auth

use async_trait::async_trait;
use thiserror::Error;

/// Async authenticator interface. Implementations must be safe to call from
/// many sessions concurrently.
#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Authenticate the given user with the given password.
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthenticationError>;

    /// Implement to set the name of the authenticator. By default it returns the type signature.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The error type returned by [`Authenticator::authenticate`].
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The username is not known to the authenticator.
    #[error("unknown user")]
    BadUser,

    /// The password did not match.
    #[error("bad password")]
    BadPassword,

    /// Another, implementation specific, error occurred.
    #[error("authentication backend error")]
    ImplPropagated(#[source] crate::BoxError),
}
