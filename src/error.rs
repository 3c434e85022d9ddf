//! Error type shared by the authenticator and the API callers.

use std::fmt::Display;

use thiserror::Error;

/// Failures surfaced to callers of the OSS client.
#[derive(Debug, Error)]
pub enum OssError {
    /// A required input was absent or blank; no request was sent.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Transport failure or non-success HTTP status from the vendor.
    #[error("{endpoint} request failed: {message}")]
    Http {
        endpoint: &'static str,
        message: String,
    },

    /// An input was present but malformed; no request was sent.
    #[error("invalid parameter {name}: {value:?}")]
    InvalidParameter {
        name: &'static str,
        value: String,
    },

    /// Login succeeded at the HTTP level but returned no token.
    #[error("authentication failed, token absent")]
    TokenAbsent,

    /// The vendor answered, but nothing usable was found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The vendor answered with a body that could not be read.
    #[error("invalid {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl OssError {
    /// Keeps the whole source chain, e.g. the refused connection behind
    /// reqwest's "error sending request".
    pub fn http<E>(endpoint: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Http {
            endpoint,
            message: format!("{:#}", anyhow::Error::from(err)),
        }
    }

    pub fn decode(endpoint: &'static str, err: impl Display) -> Self {
        Self::Decode {
            endpoint,
            message: err.to_string(),
        }
    }

    /// Short label used for failure metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            OssError::MissingParameter(_) => "missing_parameter",
            OssError::InvalidParameter { .. } => "invalid_parameter",
            OssError::Http { .. } => "http",
            OssError::TokenAbsent => "token_absent",
            OssError::NotFound(_) => "not_found",
            OssError::Decode { .. } => "decode",
        }
    }
}
