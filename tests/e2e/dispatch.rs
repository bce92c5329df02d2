//! Management command dispatch through a stub interpreter.

use district_setup::manage::{ManageRunner, SetupOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn stub_script(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("manage.sh");
    fs::write(&path, contents).expect("write stub script");
    path
}

fn runner(script: PathBuf, settings_module: &str) -> ManageRunner {
    ManageRunner::new(
        PathBuf::from("/bin/sh"),
        script,
        settings_module.to_string(),
        0,
    )
}

#[test]
fn successful_command_returns_ok() {
    let dir = TempDir::new().unwrap();
    let script = stub_script(dir.path(), "exit 0\n");
    assert!(runner(script, "publicmapping.settings").syncdb().is_ok());
}

#[test]
fn failing_command_reports_its_name_and_status() {
    let dir = TempDir::new().unwrap();
    let script = stub_script(dir.path(), "exit 3\n");
    let err = runner(script, "publicmapping.settings")
        .syncdb()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("syncdb"), "message: {message}");
}

#[test]
fn settings_module_reaches_the_child_environment() {
    let dir = TempDir::new().unwrap();
    let script = stub_script(
        dir.path(),
        "[ \"$DJANGO_SETTINGS_MODULE\" = \"test.settings\" ] || exit 9\n",
    );
    assert!(runner(script, "test.settings").syncdb().is_ok());
}

#[test]
fn setup_receives_phase_arguments() {
    let dir = TempDir::new().unwrap();
    let capture = dir.path().join("args.txt");
    let script = stub_script(
        dir.path(),
        &format!("printf '%s ' \"$@\" > {}\n", capture.display()),
    );
    let options = SetupOptions {
        views: true,
        geolevels: vec![2],
        ..SetupOptions::default()
    };
    runner(script, "publicmapping.settings")
        .setup(Path::new("config.xml"), &options)
        .unwrap();

    let captured = fs::read_to_string(&capture).unwrap();
    assert!(captured.contains("setup"));
    assert!(captured.contains("--config=config.xml"));
    assert!(captured.contains("--geolevel=2"));
    assert!(captured.contains("--views"));
    assert!(!captured.contains("--bard"));
}
