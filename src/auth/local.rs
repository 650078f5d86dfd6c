use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::errors::DashboardError;
use crate::models::{Session, User};
use crate::storage::{session_repo, Storage};

use super::{AuthError, AuthProvider, SessionSigner};

/// Mock authentication: any non-empty credentials succeed and the user is
/// remembered in local storage. Nothing leaves the machine.
pub struct LocalAuthProvider {
    storage: Arc<dyn Storage>,
    signer: SessionSigner,
    current: RwLock<Option<User>>,
}

impl LocalAuthProvider {
    /// Create the provider and restore a previously saved session, if it
    /// parses and its signature checks out.
    pub fn new(storage: Arc<dyn Storage>, signer: SessionSigner) -> Self {
        let restored = match session_repo::load_session(storage.as_ref()) {
            Ok(Some(session)) if signer.verify(&session.user, &session.token) => {
                tracing::info!(user_id = %session.user.id, "Session restored");
                Some(session.user)
            }
            Ok(Some(session)) => {
                tracing::warn!(user_id = %session.user.id, "Stored session signature invalid, discarding");
                Self::discard(storage.as_ref());
                None
            }
            Ok(None) => None,
            Err(e @ DashboardError::StorageCorrupt { .. }) => {
                tracing::warn!(error = %e, "Failed to parse stored session, discarding");
                Self::discard(storage.as_ref());
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored session");
                None
            }
        };

        Self {
            storage,
            signer,
            current: RwLock::new(restored),
        }
    }

    fn discard(storage: &dyn Storage) {
        if let Err(e) = session_repo::clear_session(storage) {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
    }

    fn start_session(&self, user: User) -> Result<User, AuthError> {
        let token = self.signer.sign(&user)?;
        session_repo::save_session(
            self.storage.as_ref(),
            &Session {
                user: user.clone(),
                token,
            },
        )?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
        tracing::info!(user_id = %user.id, email = %user.email, "Signed in");
        Ok(user)
    }
}

fn mock_user_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("user_{}", &raw[..9])
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.start_session(User {
            id: mock_user_id(),
            email: email.to_string(),
            name,
        })
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AuthError::InvalidRegistration);
        }
        self.start_session(User {
            id: mock_user_id(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    async fn logout(&self) -> Result<(), AuthError> {
        session_repo::clear_session(self.storage.as_ref())?;
        let previous = self
            .current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
