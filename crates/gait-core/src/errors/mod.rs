//! Error handling for gait validation.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod resource_error;
pub mod specification_error;
pub mod storage_error;
pub mod structural_error;
pub mod tuning_error;
pub mod validation_error;

pub use config_error::ConfigError;
pub use error_code::GaitErrorCode;
pub use resource_error::ResourceError;
pub use specification_error::SpecificationError;
pub use storage_error::StorageError;
pub use structural_error::StructuralError;
pub use tuning_error::TuningError;
pub use validation_error::ValidationError;
