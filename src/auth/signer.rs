use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::models::User;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Signs persisted sessions so a hand-edited session record is rejected
/// on restore.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
}

impl SessionSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// token = base64(HMAC-SHA256(secret, "{id}:{email}:{name}"))
    pub fn sign(&self, user: &User) -> Result<String, AuthError> {
        let mac = self.mac_for(user)?;
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    pub fn verify(&self, user: &User, token: &str) -> bool {
        let Ok(expected) = BASE64.decode(token) else {
            return false;
        };
        match self.mac_for(user) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    fn mac_for(&self, user: &User) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        mac.update(format!("{}:{}:{}", user.id, user.email, user.name).as_bytes());
        Ok(mac)
    }
}
