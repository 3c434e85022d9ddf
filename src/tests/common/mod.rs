// tests/common/mod.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;
use serde_json::json;

use crate::api::client::OssClient;
use crate::cache::token_cache::TokenCache;
use crate::config::settings::CredentialsConfig;
use crate::observability::error_log::ErrorLog;

pub const TEST_TOKEN: &str = "t-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Error log that keeps every record for assertions.
#[derive(Debug, Default)]
pub struct RecordingErrorLog {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingErrorLog {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn errors_titled(&self, title: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.severity == Severity::Error && r.title == title)
            .collect()
    }

    pub fn warnings_titled(&self, title: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.severity == Severity::Warning && r.title == title)
            .collect()
    }

    fn push(&self, severity: Severity, title: &str, message: &str) {
        self.records.lock().unwrap().push(LogRecord {
            severity,
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }
}

impl ErrorLog for RecordingErrorLog {
    fn log_error(&self, title: &str, message: &str) {
        self.push(Severity::Error, title, message);
    }

    fn log_warning(&self, title: &str, message: &str) {
        self.push(Severity::Warning, title, message);
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn credentials(base_url: &str) -> CredentialsConfig {
    CredentialsConfig {
        base_url: base_url.to_owned(),
        username: "user".to_owned(),
        password: "secret".to_owned(),
        oss_url: "https://oss.test".to_owned(),
        growatt_url: "https://server.test".to_owned(),
    }
}

pub struct Harness {
    pub client: OssClient<TokenCache>,
    pub store: Arc<TokenCache>,
    pub log: Arc<RecordingErrorLog>,
}

pub fn harness(server: &MockServer) -> Harness {
    harness_at(&server.base_url())
}

pub fn harness_at(base_url: &str) -> Harness {
    let store = Arc::new(TokenCache::new());
    let log = Arc::new(RecordingErrorLog::default());
    let client = OssClient::new(
        build_reqwest_client(),
        credentials(base_url),
        store.clone(),
        log.clone(),
    );
    Harness { client, store, log }
}

/// Login mock that only matches the expected credential payload.
pub async fn mock_login<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oss/login")
                .header("content-type", "application/json")
                .json_body(json!({
                    "username": "user",
                    "pwd": "secret",
                    "ossUrl": "https://oss.test",
                    "growattUrl": "https://server.test"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "token": token, "result": 1 }));
        })
        .await
}
