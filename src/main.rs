use monopoly_bank::api::{create_router, AppState};
use monopoly_bank::config::Settings;
use monopoly_bank::observability::{init_logging, init_metrics, mask_email, LogConfig};
use monopoly_bank::services::AccountService;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    init_logging(&LogConfig::from(&settings.application));
    info!("Configuration loaded");

    let metrics_handle = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics recorder not installed");
            None
        }
    };

    // Connect to PostgreSQL
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.pool_size)
        .acquire_timeout(settings.database.acquire_timeout())
        .connect(&settings.database.url)
        .await?;
    info!("Database connection established");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied successfully");

    let bank = AccountService::from_settings(pool.clone(), &settings)
        .ensure_bank_account(&settings.bank)
        .await?;
    info!(
        account_id = %bank.id,
        name = %bank.full_name(),
        email = %mask_email(&bank.email),
        "Bank account ready"
    );

    let mut state = AppState::new(pool, &settings);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }
    let app = create_router(state);

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
