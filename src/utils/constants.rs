//! Shared constants and invariants

pub const DEFAULT_CONFIG_PATH: &str = "growatt-plant.yaml";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
