pub mod password;
pub mod provider;
pub mod token;

pub use password::{hash_password, verify_password};
pub use provider::{AuthProvider, Credentials, TokenAuthProvider};
pub use token::TokenSigner;

#[cfg(test)]
pub use provider::MockAuthProvider;

use crate::error::AppError;
use thiserror::Error;

/// Failures of the authentication capability.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("token signing key rejected")]
    InvalidKey,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(inner) => inner,
            AuthError::InvalidKey => AppError::Internal(anyhow::anyhow!("token signing key rejected")),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}
