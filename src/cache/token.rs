use crate::helpers::time::now_u64;

/// Cache key the bearer token lives under.
pub const AUTH_TOKEN_CACHE_KEY: &str = "growatt_plant_auth_token";
/// Lifetime of a freshly stored token, in seconds.
pub const AUTH_TOKEN_TTL_SECONDS: u64 = 43200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub exp_unix_ts: u64, // UNIX TIMESTAMP
}

impl Token {
    pub fn new(value: String, exp_unix_ts: u64) -> Self {
        Self { value, exp_unix_ts }
    }

    pub fn with_ttl(value: String, ttl_seconds: u64) -> Self {
        Self::new(value, now_u64() + ttl_seconds)
    }

    pub fn is_expired(&self) -> bool {
        now_u64() >= self.exp_unix_ts
    }
}
