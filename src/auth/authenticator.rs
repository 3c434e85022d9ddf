use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::endpoints::{send_json, LOGIN};
use crate::cache::token::{AUTH_TOKEN_CACHE_KEY, AUTH_TOKEN_TTL_SECONDS};
use crate::cache::token_cache::TokenStore;
use crate::config::settings::CredentialsConfig;
use crate::error::OssError;
use crate::observability::error_log::{ErrorLog, AUTH_ERROR_TITLE};
use crate::observability::metrics::get_metrics;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    pwd: &'a str,
    oss_url: &'a str,
    growatt_url: &'a str,
}

/// Exchanges the configured credentials for a bearer token.
pub struct Authenticator<S> {
    client: Client,
    credentials: Arc<CredentialsConfig>,
    store: Arc<S>,
    error_log: Arc<dyn ErrorLog>,
}

impl<S: TokenStore> Authenticator<S> {
    pub fn new(
        client: Client,
        credentials: Arc<CredentialsConfig>,
        store: Arc<S>,
        error_log: Arc<dyn ErrorLog>,
    ) -> Self {
        Self { client, credentials, store, error_log }
    }

    /// Log in and overwrite the cached token, even if a valid one exists.
    pub async fn authenticate(&self) -> Result<String, OssError> {
        self.login()
            .await
            .inspect_err(|err| self.error_log.log_error(AUTH_ERROR_TITLE, &err.to_string()))
    }

    async fn login(&self) -> Result<String, OssError> {
        let credentials = &self.credentials;
        let payload = LoginRequest {
            username: &credentials.username,
            pwd: &credentials.password,
            oss_url: &credentials.oss_url,
            growatt_url: &credentials.growatt_url,
        };
        let request = self
            .client
            .post(LOGIN.url(&credentials.base_url))
            .json(&payload);

        let body = send_json(&LOGIN, request).await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(OssError::TokenAbsent)?
            .to_owned();

        self.store
            .set(AUTH_TOKEN_CACHE_KEY, token.clone(), AUTH_TOKEN_TTL_SECONDS)
            .await;
        get_metrics().await.logins.inc();
        info!("growatt auth token stored, expires in {}s", AUTH_TOKEN_TTL_SECONDS);
        Ok(token)
    }
}
