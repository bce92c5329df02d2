//! Config validator behavior: file checks, parsing, schema validation
//! and referential integrity, in that order.

use crate::fixtures::{self, Workspace};
use district_setup::config::{self, ConfigError};
use std::fs;
use std::path::Path;

#[test]
fn valid_config_passes_validation() {
    let workspace = Workspace::new(&fixtures::full_config(Path::new("/prj"), None));
    let result = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    );
    assert!(result.is_ok(), "expected valid config: {result:?}");
}

#[test]
fn missing_schema_file_is_reported() {
    let workspace = Workspace::new(&fixtures::full_config(Path::new("/prj"), None));
    let missing = workspace.dir.path().join("absent.xsd");
    let err = config::load_and_validate(
        &missing,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile(path) if path == missing));
}

#[test]
fn missing_config_file_is_reported() {
    let workspace = Workspace::new(&fixtures::full_config(Path::new("/prj"), None));
    let missing = workspace.dir.path().join("absent.xml");
    let err = config::load_and_validate(
        &workspace.schema_path,
        &missing,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile(path) if path == missing));
}

#[test]
fn malformed_config_is_a_parse_error() {
    let workspace = Workspace::new("<DistrictBuilder><unclosed>");
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn malformed_schema_is_a_parse_error() {
    let workspace = Workspace::new(&fixtures::full_config(Path::new("/prj"), None));
    fs::write(&workspace.schema_path, "<xs:schema").unwrap();
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn nonconforming_config_is_a_schema_violation() {
    let workspace = Workspace::new(&fixtures::schema_invalid_config(Path::new("/prj")));
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    match err {
        ConfigError::SchemaViolation { violations } => assert!(!violations.is_empty()),
        other => panic!("expected schema violation, got {other}"),
    }
}

#[test]
fn schema_violations_are_reported_before_dangling_refs() {
    // The fixture has both defects; the schema one must win.
    let workspace = Workspace::new(&fixtures::schema_invalid_config(Path::new("/prj")));
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::SchemaViolation { .. }));
}

#[test]
fn dangling_body_ref_fails_referential_check() {
    let workspace = Workspace::new(&fixtures::dangling_body_ref_config(Path::new("/prj")));
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    match err {
        ConfigError::DanglingRef { tag, reference } => {
            assert_eq!(tag, "LegislativeBody");
            assert_eq!(reference, "council");
        }
        other => panic!("expected dangling ref, got {other}"),
    }
}

#[test]
fn dangling_subject_ref_fails_referential_check() {
    let workspace = Workspace::new(&fixtures::dangling_subject_ref_config(Path::new("/prj")));
    let err = config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .unwrap_err();
    match err {
        ConfigError::DanglingRef { tag, reference } => {
            assert_eq!(tag, "Subject");
            assert_eq!(reference, "ghost");
        }
        other => panic!("expected dangling ref, got {other}"),
    }
}
