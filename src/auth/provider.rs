use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::password::verify_password;
use super::token::TokenSigner;
use super::AuthError;
use crate::config::AuthSettings;
use crate::repositories::AccountRepository;

/// Validated login credentials.
///
/// The email is trimmed and must be non-empty; the password keeps any
/// whitespace the caller sent and is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Self {
            email: email.to_string(),
            password: Zeroizing::new(password.to_string()),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Capability that turns credentials or bearer tokens into a verified user id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Uuid, AuthError>;

    fn verify_token(&self, token: &str) -> Result<Uuid, AuthError>;

    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError>;
}

/// `AuthProvider` backed by the accounts table and HMAC-signed tokens.
pub struct TokenAuthProvider {
    accounts: AccountRepository,
    signer: TokenSigner,
}

impl TokenAuthProvider {
    pub fn new(accounts: AccountRepository, settings: &AuthSettings) -> Self {
        Self {
            accounts,
            signer: TokenSigner::new(
                settings.token_secret.as_bytes(),
                Duration::seconds(settings.token_ttl_secs),
            ),
        }
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Uuid, AuthError> {
        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(credentials.password(), &account.password_hash) {
            tracing::warn!(account_id = %account.id, "Password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account.id)
    }

    fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        self.signer.verify(token, Utc::now())
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.signer.issue(user_id, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_trim_email() {
        let credentials = Credentials::try_from_parts("  ada@example.com ", " pw ").unwrap();
        assert_eq!(credentials.email(), "ada@example.com");
        assert_eq!(credentials.password(), " pw ");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::try_from_parts("ada@example.com", "hunter2").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("ada@example.com"));
    }

    #[test]
    fn test_credentials_reject_blank() {
        assert!(Credentials::try_from_parts("   ", "pw").is_err());
        assert!(Credentials::try_from_parts("ada@example.com", "").is_err());
    }

    #[tokio::test]
    async fn test_mock_provider_authenticates() {
        let user_id = Uuid::new_v4();
        let mut provider = MockAuthProvider::new();
        provider
            .expect_authenticate()
            .returning(move |_| Ok(user_id));

        let credentials = Credentials::try_from_parts("ada@example.com", "pw").unwrap();
        assert_eq!(provider.authenticate(&credentials).await.unwrap(), user_id);
    }
}
