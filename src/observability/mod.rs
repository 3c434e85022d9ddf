pub mod error_log;
pub mod metrics;
pub mod routes;
