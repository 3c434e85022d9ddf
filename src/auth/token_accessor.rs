use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::authenticator::Authenticator;
use crate::cache::token::AUTH_TOKEN_CACHE_KEY;
use crate::cache::token_cache::TokenStore;
use crate::error::OssError;
use crate::observability::metrics::get_metrics;

/// Hands out the cached bearer token, logging in on a miss.
///
/// There is no single-flight guard: concurrent misses each log in and the
/// last write wins. Every successful login is independently valid.
pub struct TokenAccessor<S> {
    store: Arc<S>,
    authenticator: Authenticator<S>,
}

impl<S: TokenStore> TokenAccessor<S> {
    pub fn new(store: Arc<S>, authenticator: Authenticator<S>) -> Self {
        Self { store, authenticator }
    }

    pub async fn token(&self) -> Result<String, OssError> {
        let metrics = get_metrics().await;
        if let Some(token) = self.store.get(AUTH_TOKEN_CACHE_KEY).await {
            metrics.token_cache_hits.inc();
            debug!("auth token served from cache");
            return Ok(token.value);
        }

        metrics.token_cache_misses.inc();
        info!("auth token cache miss, logging in");
        self.authenticator.authenticate().await?;

        self.store
            .get(AUTH_TOKEN_CACHE_KEY)
            .await
            .map(|token| token.value)
            .ok_or(OssError::TokenAbsent)
    }
}
