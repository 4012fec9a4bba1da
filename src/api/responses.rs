use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::api::requests::validation_details;
use crate::error::AppError;
use crate::models::{Account, TransactionRecord, TransactionType, TransferReceipt};

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Validation error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Maps an error kind to its HTTP status.
pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        AppError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = if status.is_server_error() {
            tracing::error!(code = self.code(), "Request failed: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ApiResponse::<()>::error(ErrorResponse::new(self.code(), message));
        (status, Json(body)).into_response()
    }
}

/// Handler error: either a domain error or a list of field validation failures.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Validation(Vec<ValidationErrorDetail>),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(validation_details(&errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::App(err) => err.into_response(),
            ApiError::Validation(details) => {
                let body = ApiResponse::<()>::error(
                    ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                        .with_details(details),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

/// Account response DTO. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub account_id: Uuid,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    pub first_name: String,
    pub last_name: String,
}

impl From<Account> for UserDetailsResponse {
    fn from(account: Account) -> Self {
        Self {
            first_name: account.first_name,
            last_name: account.last_name,
        }
    }
}

/// Ledger record DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub transfer_id: Uuid,
    pub amount: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            account_id: record.account_id,
            transfer_id: record.transfer_id,
            amount: record.amount,
            transaction_type: record.transaction_type,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub message: String,
    pub transfer_id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub amount: i64,
    pub balance: i64,
}

impl From<TransferReceipt> for TransferResponse {
    fn from(receipt: TransferReceipt) -> Self {
        Self {
            message: "Transfer successful".to_string(),
            transfer_id: receipt.transfer_id,
            from_id: receipt.from_id,
            to_id: receipt.to_id,
            amount: receipt.amount,
            balance: receipt.from_balance,
        }
    }
}
