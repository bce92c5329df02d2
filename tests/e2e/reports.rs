//! Report template generation driven by the BARD reporting section.

use crate::fixtures::{self, Workspace};
use district_setup::{config, reports, settings};
use std::fs;

fn validated(workspace: &Workspace) -> config::ConfigDocument {
    config::load_and_validate(
        &workspace.schema_path,
        &workspace.config_path,
        &fixtures::quiet_console(),
    )
    .expect("fixture config should validate")
}

#[test]
fn one_template_per_legislative_body() {
    let workspace = Workspace::with_bard();
    let config = validated(&workspace);
    let reports_config = settings::generate(
        &config,
        &workspace.template_path,
        &workspace.settings_path,
    )
    .unwrap()
    .expect("bard config should enable reports");

    let written = reports::generate(
        &config,
        &reports_config.transform,
        &reports_config.template_dir,
        &fixtures::quiet_console(),
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    let template_dir = fixtures::template_output_dir(workspace.dir.path());
    let assembly = template_dir.join("bard_assembly.html");
    let senate = template_dir.join("bard_senate.html");
    assert!(assembly.exists());
    assert!(senate.exists());
    assert!(fs::read_to_string(&assembly).unwrap().contains("Assembly"));
    assert!(fs::read_to_string(&senate).unwrap().contains("Senate"));
}

#[test]
fn output_names_lowercase_the_body_name() {
    let workspace = Workspace::with_bard();
    let config = validated(&workspace);
    let reports_config = settings::generate(
        &config,
        &workspace.template_path,
        &workspace.settings_path,
    )
    .unwrap()
    .unwrap();

    let written = reports::generate(
        &config,
        &reports_config.transform,
        &reports_config.template_dir,
        &fixtures::quiet_console(),
    )
    .unwrap();

    for path in written {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, name.to_lowercase());
        assert!(name.starts_with("bard_"));
        assert!(name.ends_with(".html"));
    }
}

#[test]
fn missing_stylesheet_propagates_an_error() {
    let workspace = Workspace::with_bard();
    let config = validated(&workspace);
    let result = reports::generate(
        &config,
        &workspace.dir.path().join("absent.xsl"),
        &fixtures::template_output_dir(workspace.dir.path()),
        &fixtures::quiet_console(),
    );
    assert!(result.is_err());
}

#[test]
fn no_templates_without_bard_config() {
    // The settings generator returns no reports config, so template
    // generation never runs; the output directory stays untouched.
    let workspace = Workspace::new(&fixtures::full_config(workspace_root(), None));
    let config = validated(&workspace);
    let reports_config = settings::generate(
        &config,
        &workspace.template_path,
        &workspace.settings_path,
    )
    .unwrap();
    assert!(reports_config.is_none());
    assert!(!fixtures::template_output_dir(workspace_root()).exists());
}

fn workspace_root() -> &'static std::path::Path {
    std::path::Path::new("/nonexistent-project-root")
}
