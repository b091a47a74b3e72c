//! Specification file round-trip through JSON and YAML.

use std::path::Path;

use gait_core::errors::{SpecificationError, StorageError};
use gait_core::types::{Task, Variable};
use gait_storage::spec_file::{decode, encode};
use gait_storage::{read_specification, write_specification, SpecFormat};
use gait_validation::spec::{CriticalPredicate, Range, RangeKey};
use test_fixtures::{phase, standard_spec};

#[test]
fn json_and_yaml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = standard_spec();
    spec.set_range(
        RangeKey::new(Task::LevelWalking, Variable::KneeFlexionAngle, phase(50)),
        Range::new(0.0, 1.2, "mid-stance").with_critical(CriticalPredicate::OutsideLimits {
            lower: -0.5,
            upper: 2.0,
        }),
    );
    // Required with no ranges survives as an empty phase map.
    spec.require(Task::LevelWalking, Variable::PelvisTiltAngle);

    for name in ["spec.json", "spec.yaml", "spec.yml"] {
        let path = dir.path().join(name);
        write_specification(&path, &spec).unwrap();
        let loaded = read_specification(&path).unwrap();
        assert_eq!(loaded, spec, "{name}");
        assert_eq!(loaded.fingerprint(), spec.fingerprint());
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = SpecFormat::from_path(Path::new("ranges.csv")).unwrap_err();
    assert!(matches!(err, StorageError::UnsupportedFormat { extension } if extension == "csv"));
    assert!(write_specification(Path::new("ranges"), &standard_spec()).is_err());
}

#[test]
fn unknown_labels_are_rejected() {
    let text = r#"{ "level_walking": { "toe_wiggle_angle": { "50": { "min": 0.0, "max": 1.0 } } } }"#;
    let err = decode(text, SpecFormat::Json).unwrap_err();
    assert!(matches!(
        err,
        StorageError::InvalidSpecification(SpecificationError::UnknownVariable { label })
            if label == "toe_wiggle_angle"
    ));

    let text = "moonwalk:\n  knee_flexion_angle: {}\n";
    let err = decode(text, SpecFormat::Yaml).unwrap_err();
    assert!(matches!(
        err,
        StorageError::InvalidSpecification(SpecificationError::UnknownTask { .. })
    ));

    let text = r#"{ "level_walking": { "knee_flexion_angle": { "abc": { "min": 0.0, "max": 1.0 } } } }"#;
    assert!(matches!(
        decode(text, SpecFormat::Json).unwrap_err(),
        StorageError::InvalidSpecification(SpecificationError::UnknownPhase { .. })
    ));
}

#[test]
fn inverted_range_is_rejected() {
    let text = r#"{ "level_walking": { "knee_flexion_angle": { "50": { "min": 1.0, "max": 0.5 } } } }"#;
    assert!(matches!(
        decode(text, SpecFormat::Json).unwrap_err(),
        StorageError::InvalidSpecification(SpecificationError::InvalidRange { .. })
    ));
}

#[test]
fn malformed_text_is_a_serialization_error() {
    assert!(matches!(
        decode("{ not json", SpecFormat::Json).unwrap_err(),
        StorageError::Serialization { .. }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_specification(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn encoded_json_uses_labels() {
    let text = encode(&standard_spec(), SpecFormat::Json).unwrap();
    assert!(text.contains("\"level_walking\""));
    assert!(text.contains("\"knee_flexion_angle\""));
    assert!(text.contains("\"50\""));
}
