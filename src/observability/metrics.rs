use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // HTTP
    pub api_requests: IntCounterVec,
    pub api_request_failures: IntCounterVec,
    pub api_request_duration: HistogramVec,

    // Tokens
    pub token_refreshes: IntCounterVec,
    pub token_refresh_failures: IntCounterVec,

    // Bitable batches
    pub batch_chunks: IntCounterVec,
    pub batch_records: IntCounterVec,

    // Config
    pub config_parse_failures: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("feishu".into()), None).expect("metrics registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            api_requests: IntCounterVec::new(Opts::new("api_requests_total", "Total API requests by method"), &["method"]).expect("metric"),
            api_request_failures: IntCounterVec::new(Opts::new("api_request_failures_total", "API request failures by reason"), &["reason"]).expect("metric"),
            api_request_duration: HistogramVec::new(HistogramOpts::new("api_request_duration_seconds", "API request duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["method"]).expect("metric"),

            token_refreshes: IntCounterVec::new(Opts::new("token_refreshes_total", "Access token refreshes by kind"), &["kind"]).expect("metric"),
            token_refresh_failures: IntCounterVec::new(Opts::new("token_refresh_failures_total", "Access token refresh failures by kind"), &["kind"]).expect("metric"),

            batch_chunks: IntCounterVec::new(Opts::new("batch_chunks_total", "Batch chunks sent by operation"), &["operation"]).expect("metric"),
            batch_records: IntCounterVec::new(Opts::new("batch_records_total", "Records sent in batches by operation"), &["operation"]).expect("metric"),

            config_parse_failures: IntCounter::new("config_parse_failures_total", "Config parse/validation failures").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.api_requests.clone())).expect("register");
        reg.register(Box::new(metrics.api_request_failures.clone())).expect("register");
        reg.register(Box::new(metrics.api_request_duration.clone())).expect("register");
        reg.register(Box::new(metrics.token_refreshes.clone())).expect("register");
        reg.register(Box::new(metrics.token_refresh_failures.clone())).expect("register");
        reg.register(Box::new(metrics.batch_chunks.clone())).expect("register");
        reg.register(Box::new(metrics.batch_records.clone())).expect("register");
        reg.register(Box::new(metrics.config_parse_failures.clone())).expect("register");

        metrics
    }

    /// Prometheus text exposition of everything registered.
    pub fn gather_text(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            return format!("# metrics encoding failed: {}\n", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
