//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Credentials: URL schemes and non-empty login fields
//! - Settings: server port, metrics path, logging level, HTTP timeout

use tracing::{error, info};

use crate::config::settings::{CredentialsConfig, LoggingConfig, ServiceConfig, SettingsConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config error: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be greater than 0".to_string());
    }
    if let Some(logging) = &settings.logging {
        validate_logging(logging, errors);
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    if !is_http_url(&credentials.base_url) {
        errors.push(format!(
            "credentials.base_url '{}' must be an http(s) URL",
            credentials.base_url
        ));
    }
    let required = [
        ("username", &credentials.username),
        ("password", &credentials.password),
        ("oss_url", &credentials.oss_url),
        ("growatt_url", &credentials.growatt_url),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("credentials.{} must not be empty", field));
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}
