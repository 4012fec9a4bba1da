use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::api::extractors::{parse_id, AuthenticatedUser, JsonBody};
use crate::api::requests::{CreateAccountRequest, LoginRequest, TransferRequestBody};
use crate::api::responses::{
    AccountResponse, ApiError, ApiResponse, AuthResponse, BalanceResponse, TransactionResponse,
    TransferResponse, UserDetailsResponse,
};
use crate::auth::Credentials;
use crate::error::AppError;
use crate::observability::{get_metrics, mask_email, AggregatedHealth};

use super::routes::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<AggregatedHealth>) {
    let health = state.health_checker.check_all().await;
    let status = if health.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(health))
}

/// Readiness check endpoint.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.health_checker.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus exposition endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics recorder not installed".to_string(),
        ),
    }
}

// ============================================================================
// Auth Handlers
// ============================================================================

/// Registers an account and returns a token for it.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    request.validate()?;

    let account = state.accounts.create(request.into()).await?;
    let token = state.auth.issue_token(account.id).map_err(AppError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse {
            token,
            user: AccountResponse::from(account),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<AuthResponse> {
    request.validate()?;

    let credentials =
        Credentials::try_from_parts(&request.email, &request.password).map_err(AppError::from)?;

    let user_id = match state.auth.authenticate(&credentials).await {
        Ok(id) => id,
        Err(e) => {
            get_metrics().record_login(false);
            tracing::info!(email = %mask_email(credentials.email()), "Login failed");
            return Err(AppError::from(e).into());
        }
    };
    get_metrics().record_login(true);

    let account = state.accounts.get_by_id(user_id).await?;
    let token = state.auth.issue_token(user_id).map_err(AppError::from)?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: AccountResponse::from(account),
    })))
}

// ============================================================================
// Account Handlers
// ============================================================================

pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Vec<AccountResponse>> {
    let accounts = state.accounts.list_all().await?;
    Ok(Json(ApiResponse::success(
        accounts.into_iter().map(AccountResponse::from).collect(),
    )))
}

/// Creates an account without issuing a token.
pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    request.validate()?;

    let account = state.accounts.create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountResponse::from(account))),
    ))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AccountResponse> {
    let account = state.accounts.get_by_id(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.accounts.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BalanceResponse> {
    let account_id = parse_id(&id)?;
    let balance = state.accounts.get_balance(account_id).await?;
    Ok(Json(ApiResponse::success(BalanceResponse { account_id, balance })))
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TransactionResponse>> {
    let history = state.accounts.get_history(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::success(
        history.into_iter().map(TransactionResponse::from).collect(),
    )))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<AccountResponse> {
    let account = state.accounts.get_by_email(&email).await?;
    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

/// Public name lookup; returns nothing but first and last name.
pub async fn get_user_details(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<UserDetailsResponse> {
    let account = state.accounts.get_by_email(&email).await?;
    Ok(Json(ApiResponse::success(UserDetailsResponse::from(account))))
}

// ============================================================================
// Transfer Handlers
// ============================================================================

/// Transfers from the authenticated user's account to `toId`.
pub async fn transfer(
    State(state): State<AppState>,
    AuthenticatedUser(from_id): AuthenticatedUser,
    JsonBody(request): JsonBody<TransferRequestBody>,
) -> ApiResult<TransferResponse> {
    request.validate()?;

    let receipt = state
        .transfers
        .transfer(from_id, request.to_id, request.amount)
        .await?;

    Ok(Json(ApiResponse::success(TransferResponse::from(receipt))))
}
