use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::token::Token;

/// Keyed store with per-entry expiry.
///
/// `get` only yields live, non-empty values; `set` always overwrites.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Option<Token>> + Send;

    fn set(&self, key: &str, value: String, ttl_seconds: u64) -> impl Future<Output = ()> + Send;
}

/// In-process token store: key -> token
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, Token>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry, expired or not
    pub async fn entry(&self, key: &str) -> Option<Token> {
        self.inner.read().await.get(key).cloned()
    }
}

impl TokenStore for TokenCache {
    async fn get(&self, key: &str) -> Option<Token> {
        let map = self.inner.read().await;
        map.get(key)
            .filter(|token| !token.value.is_empty() && !token.is_expired())
            .cloned()
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), Token::with_ttl(value, ttl_seconds));
    }
}
