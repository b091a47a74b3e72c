//! GaitErrorCode trait for stable machine-readable error codes.

/// Every error enum implements this to expose a stable error code string
/// for reporting tools and persisted audit entries.
pub trait GaitErrorCode {
    /// Returns the error code string (e.g., "STRUCTURAL_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STRUCTURAL_ERROR: &str = "STRUCTURAL_ERROR";
pub const SPECIFICATION_NOT_FOUND: &str = "SPECIFICATION_NOT_FOUND";
pub const INVALID_SPECIFICATION: &str = "INVALID_SPECIFICATION";
pub const UNKNOWN_VERSION: &str = "UNKNOWN_VERSION";
pub const STALE_PROPOSAL: &str = "STALE_PROPOSAL";
pub const RESOURCE_ERROR: &str = "RESOURCE_ERROR";
pub const TUNING_ERROR: &str = "TUNING_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CANCELLED: &str = "CANCELLED";
