use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, Result};

const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    pub accounts: AccountSettings,
    pub transfer: TransferSettings,
    pub bank: BankSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

/// Secret material and parameters for token signing and password hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub token_secret: String,
    pub token_ttl_secs: i64,
    /// bcrypt cost factor, 4 to 31.
    pub password_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSettings {
    /// Balance granted to every newly registered account, in minor units.
    pub starting_balance: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferSettings {
    pub timeout_ms: u64,
}

/// The house account seeded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct BankSettings {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub initial_balance: i64,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the server cannot safely start with.
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_secret.trim().is_empty() {
            return Err(AppError::InvalidInput("auth.token_secret must be set".to_string()));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(AppError::InvalidInput("auth.token_ttl_secs must be positive".to_string()));
        }
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.auth.password_cost) {
            return Err(AppError::InvalidInput(format!(
                "auth.password_cost must be between {} and {}",
                MIN_PASSWORD_COST, MAX_PASSWORD_COST
            )));
        }
        if self.accounts.starting_balance < 0 {
            return Err(AppError::InvalidInput(
                "accounts.starting_balance cannot be negative".to_string(),
            ));
        }
        if self.transfer.timeout_ms == 0 {
            return Err(AppError::InvalidInput("transfer.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl TransferSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}
