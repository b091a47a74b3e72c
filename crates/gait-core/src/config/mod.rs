//! Configuration system for gait validation.
//! TOML-based, 4-layer resolution: overrides > env > project > user > defaults.

pub mod audit_config;
pub mod batch_config;
pub mod classifier_config;
pub mod gait_config;
pub mod tuner_config;

pub use audit_config::AuditConfig;
pub use batch_config::BatchConfig;
pub use classifier_config::{ClassifierConfig, MissingRangePolicy};
pub use gait_config::{ConfigOverrides, GaitConfig};
pub use tuner_config::TunerConfig;
