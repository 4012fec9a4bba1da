use monopoly_bank::config::ApplicationSettings;
use monopoly_bank::observability::{
    get_metrics, init_metrics, mask_email, mask_sensitive, mask_uuid, AggregatedHealth,
    DependencyHealth, HealthStatus, LatencyTimer, LogConfig, LogFormat,
};
use uuid::Uuid;

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
}

#[test]
fn test_log_config_from_settings() {
    let settings = ApplicationSettings {
        host: "0.0.0.0".to_string(),
        port: 3000,
        log_level: "debug".to_string(),
        log_format: "JSON".to_string(),
    };
    let config = LogConfig::from(&settings);
    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn test_log_format_from_str() {
    assert_eq!(LogFormat::from("json"), LogFormat::Json);
    assert_eq!(LogFormat::from("COMPACT"), LogFormat::Compact);
    assert_eq!(LogFormat::from("unknown"), LogFormat::Pretty);
}

#[test]
fn test_masking() {
    assert_eq!(mask_sensitive("1234567890", 2), "12******90");
    assert_eq!(mask_sensitive("1234", 2), "****");

    let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
    let masked = mask_uuid(&uuid);
    assert!(masked.starts_with("550e"));
    assert!(masked.ends_with("0000"));
    assert_eq!(masked.len(), 36);

    assert_eq!(mask_email("alice@example.com"), "a***e@example.com");
}

#[test]
fn test_prometheus_render_includes_bank_metrics() {
    let handle = init_metrics().unwrap();
    let metrics = get_metrics();

    metrics.record_transfer_completed();
    metrics.record_transfer_failed("INSUFFICIENT_FUNDS");
    metrics.record_transfer_latency(3.5);
    metrics.record_account_created();
    metrics.record_login(true);

    let rendered = handle.render();
    assert!(rendered.contains("bank_transfers_completed_total"));
    assert!(rendered.contains("reason=\"INSUFFICIENT_FUNDS\""));
    assert!(rendered.contains("bank_accounts_created_total"));

    // A second init hands back the same recorder.
    assert!(init_metrics().is_ok());
}

#[test]
fn test_latency_timer() {
    let timer = LatencyTimer::new();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let elapsed = timer.elapsed_ms();
    assert!(elapsed >= 10.0);
    assert!(elapsed < 1000.0);
}

#[test]
fn test_dependency_health_constructors() {
    let healthy = DependencyHealth::healthy("database", 5.0);
    assert_eq!(healthy.status, HealthStatus::Healthy);
    assert_eq!(healthy.latency_ms, Some(5.0));
    assert!(healthy.message.is_none());

    let degraded = DependencyHealth::degraded("database", 150.0, "High latency detected");
    assert_eq!(degraded.status, HealthStatus::Degraded);
    assert_eq!(degraded.latency_ms, Some(150.0));

    let unhealthy = DependencyHealth::unhealthy("database", "Connection refused");
    assert_eq!(unhealthy.status, HealthStatus::Unhealthy);
    assert!(unhealthy.latency_ms.is_none());
}

#[test]
fn test_aggregated_health_takes_worst_status() {
    let health = AggregatedHealth::new(
        "0.1.0".to_string(),
        60,
        vec![DependencyHealth::healthy("database", 1.0)],
    );
    assert_eq!(health.status, HealthStatus::Healthy);

    let health = AggregatedHealth::new(
        "0.1.0".to_string(),
        60,
        vec![DependencyHealth::degraded("database", 250.0, "Slow")],
    );
    assert_eq!(health.status, HealthStatus::Degraded);

    let health = AggregatedHealth::new(
        "0.1.0".to_string(),
        60,
        vec![
            DependencyHealth::degraded("database", 250.0, "Slow"),
            DependencyHealth::unhealthy("database", "Down"),
        ],
    );
    assert_eq!(health.status, HealthStatus::Unhealthy);
}

#[test]
fn test_aggregated_health_serialization() {
    let health = AggregatedHealth::new(
        "0.1.0".to_string(),
        100,
        vec![DependencyHealth::healthy("database", 5.5)],
    );
    let json = serde_json::to_string(&health).unwrap();

    assert!(json.contains("\"status\":\"healthy\""));
    assert!(json.contains("\"uptime_seconds\":100"));
    assert!(json.contains("\"latency_ms\":5.5"));
}
