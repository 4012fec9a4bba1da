use thiserror::Error;
use uuid::Uuid;

/// Application-wide error type.
///
/// Business outcomes (`InsufficientFunds`, `AccountNotFound`, ...) are typed
/// variants so the HTTP layer can map them to status codes without looking at
/// message text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds in account '{account_id}': requested {requested}, available {available}")]
    InsufficientFunds {
        account_id: Uuid,
        requested: i64,
        available: i64,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Classifies a sqlx error into the most specific kind that can be detected.
    pub fn store(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::AccountNotFound(db_err.message().to_string())
            }
            sqlx::Error::RowNotFound => AppError::AccountNotFound("row not found".to_string()),
            _ => {
                tracing::error!(error = %err, "Store operation failed");
                AppError::StoreUnavailable(err.to_string())
            }
        }
    }

    /// Stable machine-readable code for API responses and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AppError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            AppError::Conflict(_) => "CONFLICT",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        AppError::AccountNotFound(format!("Account with id '{}' not found", id))
    }
}
