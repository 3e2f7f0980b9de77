//! [`Authenticator`] implementation backed by a concurrent in-memory map.
//!
//! [`Authenticator`]: crate::auth::Authenticator

use crate::auth::{AuthenticationError, Authenticator};
use async_trait::async_trait;
use dashmap::DashMap;
use std::fmt;

/// [`Authenticator`](crate::auth::Authenticator) implementation that keeps
/// credentials in a concurrent in-memory map. Accounts can be added and
/// removed while the server is running; sessions observe the change on their
/// next `PASS` command.
///
/// Passwords are stored as given. Hashing them before insertion is the
/// caller's concern.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use sandftp::auth::{Authenticator, InMemoryAuthenticator};
///
/// let auth = InMemoryAuthenticator::new();
/// auth.add_user("alice", "12345678");
/// assert!(auth.authenticate("alice", "12345678").await.is_ok());
/// # }
/// ```
#[derive(Default)]
pub struct InMemoryAuthenticator {
    users: DashMap<String, String>,
}

impl InMemoryAuthenticator {
    /// Creates an authenticator with no accounts.
    pub fn new() -> Self {
        InMemoryAuthenticator { users: DashMap::new() }
    }

    /// Adds an account, replacing the password if the username already exists.
    pub fn add_user<U: Into<String>, P: Into<String>>(&self, username: U, password: P) {
        self.users.insert(username.into(), password.into());
    }

    /// Removes an account. Unknown usernames are ignored.
    pub fn remove_user(&self, username: &str) {
        self.users.remove(username);
    }
}

impl fmt::Debug for InMemoryAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the credential map itself.
        f.debug_struct("InMemoryAuthenticator").field("users", &self.users.len()).finish()
    }
}

#[async_trait]
impl Authenticator for InMemoryAuthenticator {
    #[tracing_attributes::instrument]
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthenticationError> {
        match self.users.get(username) {
            Some(entry) if entry.value() == password => Ok(()),
            Some(_) => Err(AuthenticationError::BadPassword),
            None => Err(AuthenticationError::BadUser),
        }
    }
}
