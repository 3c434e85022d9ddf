use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Vendor API metrics
    pub oss_requests: IntCounterVec,
    pub oss_request_failures: IntCounterVec,
    pub oss_request_duration: HistogramVec,

    // Auth / token cache metrics
    pub logins: IntCounter,
    pub token_cache_hits: IntCounter,
    pub token_cache_misses: IntCounter,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("growattplant".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Vendor API
            oss_requests: IntCounterVec::new(Opts::new("oss_requests_total", "Total OSS API requests by endpoint"),&["endpoint", "method"],).unwrap(),
            oss_request_failures: IntCounterVec::new(Opts::new("oss_request_failures_total", "OSS API failures by reason"),&["endpoint", "reason"],).unwrap(),
            oss_request_duration: HistogramVec::new(HistogramOpts::new("oss_request_duration_seconds", "OSS API request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["endpoint"],).unwrap(),

            // Auth
            logins: IntCounter::new("logins_total", "Successful OSS logins").unwrap(),
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Bearer token served from cache").unwrap(),
            token_cache_misses: IntCounter::new("token_cache_misses_total", "Bearer token missing from cache").unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.oss_requests.clone())).unwrap();
        reg.register(Box::new(metrics.oss_request_failures.clone())).unwrap();
        reg.register(Box::new(metrics.oss_request_duration.clone())).unwrap();
        reg.register(Box::new(metrics.logins.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
