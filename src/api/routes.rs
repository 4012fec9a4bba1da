use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::auth::{AuthProvider, TokenAuthProvider};
use crate::config::Settings;
use crate::observability::HealthChecker;
use crate::repositories::AccountRepository;
use crate::services::{AccountService, TransferEngine};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub transfers: TransferEngine,
    pub auth: Arc<dyn AuthProvider>,
    pub metrics_handle: Option<PrometheusHandle>,
    pub health_checker: Arc<HealthChecker>,
}

impl AppState {
    /// Wires services from settings, with the token provider backed by the accounts table.
    pub fn new(pool: PgPool, settings: &Settings) -> Self {
        let auth = TokenAuthProvider::new(AccountRepository::new(pool.clone()), &settings.auth);
        Self {
            accounts: AccountService::from_settings(pool.clone(), settings),
            transfers: TransferEngine::new(pool.clone(), &settings.transfer),
            auth: Arc::new(auth),
            metrics_handle: None,
            health_checker: Arc::new(HealthChecker::new(pool)),
        }
    }

    /// Adds metrics handle to the state.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Browsers may call from any origin with the bearer header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/live", get(handlers::liveness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        // Auth endpoints
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        // Account endpoints
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/accounts/:id",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .route("/accounts/:id/balance", get(handlers::get_balance))
        .route("/accounts/:id/transactions", get(handlers::get_transactions))
        // Legacy paths kept for existing clients
        .route(
            "/account",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/account/:id",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .route("/balance/:id", get(handlers::get_balance))
        .route("/transactions/:id", get(handlers::get_transactions))
        .route("/user-by-email/:email", get(handlers::get_user_by_email))
        .route("/user-details/:email", get(handlers::get_user_details))
        // Transfer endpoint
        .route("/transfer", post(handlers::transfer))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer())
        .with_state(state)
}
