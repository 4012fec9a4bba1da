use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for the bank backend.
///
/// Recording is a no-op until a recorder is installed, so services can call
/// these from tests without any setup.
#[derive(Debug, Clone, Default)]
pub struct Metrics;

impl Metrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_transfer_completed(&self) {
        counter!("bank_transfers_completed_total").increment(1);
    }

    pub fn record_transfer_failed(&self, reason: &str) {
        counter!("bank_transfers_failed_total", "reason" => reason.to_string()).increment(1);
    }

    pub fn record_transfer_latency(&self, duration_ms: f64) {
        histogram!("bank_transfer_duration_ms").record(duration_ms);
    }

    pub fn record_account_created(&self) {
        counter!("bank_accounts_created_total").increment(1);
    }

    pub fn record_account_deleted(&self) {
        counter!("bank_accounts_deleted_total").increment(1);
    }

    pub fn record_login(&self, success: bool) {
        counter!("bank_logins_total", "success" => success.to_string()).increment(1);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the Prometheus recorder once and returns its handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    METRICS.get_or_init(Metrics::new);

    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

fn describe_metrics() {
    describe_counter!("bank_transfers_completed_total", Unit::Count, "Total number of committed transfers");
    describe_counter!("bank_transfers_failed_total", Unit::Count, "Total number of rejected or rolled back transfers");
    describe_histogram!("bank_transfer_duration_ms", Unit::Milliseconds, "Transfer latency in milliseconds");

    describe_counter!("bank_accounts_created_total", Unit::Count, "Total number of accounts created");
    describe_counter!("bank_accounts_deleted_total", Unit::Count, "Total number of accounts deleted");
    describe_counter!("bank_logins_total", Unit::Count, "Total login attempts");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
