pub mod local;
pub mod signer;

pub use local::LocalAuthProvider;
pub use signer::SessionSigner;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::User;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid registration details")]
    InvalidRegistration,

    #[error("session signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Login state behind a swappable backend. Views only see this trait.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<User>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}
