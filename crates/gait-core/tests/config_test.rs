//! Tests for the configuration system.

use std::sync::Mutex;

use gait_core::config::{ConfigOverrides, GaitConfig, MissingRangePolicy};
use gait_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_gait_env_vars() {
    for key in [
        "GAIT_CLASSIFIER_MISSING_RANGE_POLICY",
        "GAIT_BATCH_CHUNK_SIZE",
        "GAIT_BATCH_THREADS",
        "GAIT_BATCH_TIME_BUDGET_MS",
        "GAIT_BATCH_MEMORY_BUDGET_BYTES",
        "GAIT_TUNER_MIN_SAMPLES",
        "GAIT_AUDIT_DATABASE_PATH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gait_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("gait.toml"),
        r#"
[batch]
chunk_size = 64
threads = 2

[classifier]
missing_range_policy = "fail_closed"
"#,
    )
    .unwrap();

    std::env::set_var("GAIT_BATCH_THREADS", "6");

    let overrides = ConfigOverrides {
        chunk_size: Some(32),
        ..Default::default()
    };
    let config = GaitConfig::load(dir.path(), Some(&overrides)).unwrap();

    assert_eq!(config.batch.chunk_size, Some(32));
    assert_eq!(config.batch.threads, Some(6));
    assert_eq!(
        config.classifier.effective_missing_range_policy(),
        MissingRangePolicy::FailClosed
    );

    clear_gait_env_vars();
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gait_env_vars();

    let dir = tempdir();
    let config = GaitConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.batch.effective_chunk_size(), 256);
    assert_eq!(
        config.classifier.effective_missing_range_policy(),
        MissingRangePolicy::Skip
    );
    assert!((config.classifier.effective_minor_fraction() - 0.10).abs() < 1e-12);
    assert!((config.tuner.effective_percentile_coverage() - 0.95).abs() < 1e-12);
}

#[test]
fn test_invalid_project_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gait_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("gait.toml"), "[batch\nchunk_size = ").unwrap();
    let err = GaitConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_bad_values() {
    let err = GaitConfig::from_toml("[batch]\nchunk_size = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "batch.chunk_size"));

    let err = GaitConfig::from_toml("[tuner]\npercentile_coverage = 1.5\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "tuner.percentile_coverage"));

    let err = GaitConfig::from_toml("[batch]\nchunk_size = 4\nmin_chunk_size = 16\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "batch.min_chunk_size"));
}

#[test]
fn test_toml_round_trip() {
    let config = GaitConfig::from_toml(
        r#"
[batch]
chunk_size = 128
top_reasons = 5

[audit]
record_rejections = false
"#,
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let again = GaitConfig::from_toml(&text).unwrap();
    assert_eq!(again.batch.chunk_size, Some(128));
    assert_eq!(again.batch.effective_top_reasons(), 5);
    assert!(!again.audit.effective_record_rejections());
}

#[test]
fn test_unknown_env_policy_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gait_env_vars();
    std::env::set_var("GAIT_CLASSIFIER_MISSING_RANGE_POLICY", "sometimes");

    let dir = tempdir();
    let config = GaitConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.classifier.missing_range_policy, None);

    clear_gait_env_vars();
}
