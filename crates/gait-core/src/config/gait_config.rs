//! Top-level configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AuditConfig, BatchConfig, ClassifierConfig, MissingRangePolicy, TunerConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`GAIT_*`)
/// 3. Project config (`gait.toml` in project root)
/// 4. User config (`~/.gait/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GaitConfig {
    pub classifier: ClassifierConfig,
    pub batch: BatchConfig,
    pub tuner: TunerConfig,
    pub audit: AuditConfig,
}

/// Overrides supplied by the embedding tool (e.g. parsed CLI flags).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub missing_range_policy: Option<MissingRangePolicy>,
    pub chunk_size: Option<usize>,
    pub threads: Option<usize>,
    pub time_budget_ms: Option<u64>,
}

impl GaitConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("gait.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): overrides
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: GaitConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &GaitConfig) -> Result<(), ConfigError> {
        if let Some(f) = config.classifier.minor_fraction {
            if !(f.is_finite() && f >= 0.0) {
                return Err(invalid("classifier.minor_fraction", "must be a finite value >= 0.0"));
            }
        }
        if config.batch.chunk_size == Some(0) {
            return Err(invalid("batch.chunk_size", "must be greater than 0"));
        }
        if config.batch.min_chunk_size == Some(0) {
            return Err(invalid("batch.min_chunk_size", "must be greater than 0"));
        }
        if config.batch.effective_min_chunk_size() > config.batch.effective_chunk_size() {
            return Err(invalid("batch.min_chunk_size", "must not exceed batch.chunk_size"));
        }
        if config.batch.max_strides == Some(0) {
            return Err(invalid("batch.max_strides", "must be greater than 0"));
        }
        if config.batch.time_budget_ms == Some(0) {
            return Err(invalid("batch.time_budget_ms", "must be greater than 0"));
        }
        if let Some(f) = config.batch.max_structural_failure_fraction {
            if !(0.0..=1.0).contains(&f) {
                return Err(invalid(
                    "batch.max_structural_failure_fraction",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        if let Some(c) = config.tuner.percentile_coverage {
            if !(c > 0.0 && c < 1.0) {
                return Err(invalid("tuner.percentile_coverage", "must be in (0.0, 1.0)"));
            }
        }
        if let Some(k) = config.tuner.std_multiplier {
            if !(k.is_finite() && k > 0.0) {
                return Err(invalid("tuner.std_multiplier", "must be greater than 0.0"));
            }
        }
        if let Some(k) = config.tuner.tukey_multiplier {
            if !(k.is_finite() && k >= 0.0) {
                return Err(invalid("tuner.tukey_multiplier", "must be >= 0.0"));
            }
        }
        if config.tuner.min_samples.is_some_and(|n| n < 2) {
            return Err(invalid("tuner.min_samples", "must be at least 2"));
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".gait").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut GaitConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: GaitConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut GaitConfig, other: &GaitConfig) {
        fn take<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                base.clone_from(other);
            }
        }

        take(&mut base.classifier.missing_range_policy, &other.classifier.missing_range_policy);
        take(&mut base.classifier.minor_fraction, &other.classifier.minor_fraction);

        take(&mut base.batch.chunk_size, &other.batch.chunk_size);
        take(&mut base.batch.min_chunk_size, &other.batch.min_chunk_size);
        take(&mut base.batch.threads, &other.batch.threads);
        take(&mut base.batch.max_strides, &other.batch.max_strides);
        take(&mut base.batch.memory_budget_bytes, &other.batch.memory_budget_bytes);
        take(&mut base.batch.time_budget_ms, &other.batch.time_budget_ms);
        take(
            &mut base.batch.max_structural_failure_fraction,
            &other.batch.max_structural_failure_fraction,
        );
        take(&mut base.batch.top_reasons, &other.batch.top_reasons);

        take(&mut base.tuner.min_samples, &other.tuner.min_samples);
        take(&mut base.tuner.percentile_coverage, &other.tuner.percentile_coverage);
        take(&mut base.tuner.std_multiplier, &other.tuner.std_multiplier);
        take(&mut base.tuner.tukey_multiplier, &other.tuner.tukey_multiplier);

        take(&mut base.audit.record_rejections, &other.audit.record_rejections);
        take(&mut base.audit.database_path, &other.audit.database_path);
        take(&mut base.audit.query_limit, &other.audit.query_limit);
    }

    /// Apply environment variable overrides.
    /// Pattern: `GAIT_BATCH_CHUNK_SIZE`, `GAIT_CLASSIFIER_MISSING_RANGE_POLICY`, etc.
    fn apply_env_overrides(config: &mut GaitConfig) {
        if let Ok(val) = std::env::var("GAIT_CLASSIFIER_MISSING_RANGE_POLICY") {
            match val.as_str() {
                "skip" => config.classifier.missing_range_policy = Some(MissingRangePolicy::Skip),
                "fail_closed" => {
                    config.classifier.missing_range_policy = Some(MissingRangePolicy::FailClosed)
                }
                other => tracing::warn!(value = other, "ignoring unknown missing range policy"),
            }
        }
        if let Ok(val) = std::env::var("GAIT_BATCH_CHUNK_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.batch.chunk_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GAIT_BATCH_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.batch.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GAIT_BATCH_TIME_BUDGET_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.batch.time_budget_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GAIT_BATCH_MEMORY_BUDGET_BYTES") {
            if let Ok(v) = val.parse::<u64>() {
                config.batch.memory_budget_bytes = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GAIT_TUNER_MIN_SAMPLES") {
            if let Ok(v) = val.parse::<usize>() {
                config.tuner.min_samples = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GAIT_AUDIT_DATABASE_PATH") {
            config.audit.database_path = Some(val);
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut GaitConfig, o: &ConfigOverrides) {
        if let Some(v) = o.missing_range_policy {
            config.classifier.missing_range_policy = Some(v);
        }
        if let Some(v) = o.chunk_size {
            config.batch.chunk_size = Some(v);
        }
        if let Some(v) = o.threads {
            config.batch.threads = Some(v);
        }
        if let Some(v) = o.time_budget_ms {
            config.batch.time_budget_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
