use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies bearer tokens of the form `user_id.expiry.signature`,
/// where the signature is a hex HMAC-SHA256 over `user_id.expiry`.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthError::InvalidKey)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    pub fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = (now + self.ttl).timestamp();
        let payload = format!("{}.{}", user_id, expires_at);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{}.{}", payload, signature))
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let mut parts = token.trim().splitn(3, '.');
        let (Some(user_part), Some(expiry_part), Some(signature_part)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken);
        };

        let signature = hex::decode(signature_part).map_err(|_| AuthError::InvalidToken)?;
        self.mac(&format!("{}.{}", user_part, expiry_part))?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let expires_at: i64 = expiry_part.parse().map_err(|_| AuthError::InvalidToken)?;
        if now.timestamp() >= expires_at {
            return Err(AuthError::TokenExpired);
        }

        Uuid::parse_str(user_part).map_err(|_| AuthError::InvalidToken)
    }
}
