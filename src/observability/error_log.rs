//! Structured sink for failures and soft warnings raised while talking to the vendor.

use tracing::{error, warn};

pub const AUTH_ERROR_TITLE: &str = "Growatt Auth Error";
pub const ACTIVE_EQUIPMENT_ERROR_TITLE: &str = "Growatt Active Equipments Error";
pub const SN_DATA_ERROR_TITLE: &str = "Growatt SN Data Error";
pub const DEVICES_ERROR_TITLE: &str = "Growatt Devices Error";
pub const PLANT_LOOKUP_ERROR_TITLE: &str = "Growatt Plant Lookup Error";

pub trait ErrorLog: Send + Sync {
    /// Record a failure that is about to be returned to the caller.
    fn log_error(&self, title: &str, message: &str);

    /// Record a well-formed response that carried nothing useful.
    fn log_warning(&self, title: &str, message: &str);
}

/// Emits every record as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    fn log_error(&self, title: &str, message: &str) {
        error!(title = %title, detail = %message, "growatt error");
    }

    fn log_warning(&self, title: &str, message: &str) {
        warn!(title = %title, detail = %message, "growatt warning");
    }
}
