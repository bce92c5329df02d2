//! Dispatch to the framework's external management commands.
//!
//! `syncdb` and `setup` are opaque collaborators hosted by the web
//! framework; this module only assembles their command lines. The
//! settings module is handed to each child process environment
//! explicitly instead of mutating this process's environment.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable the framework reads to locate its settings.
const SETTINGS_ENV: &str = "DJANGO_SETTINGS_MODULE";

/// Setup phases selected on the command line.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub database: bool,
    pub geolevels: Vec<u32>,
    pub views: bool,
    pub geoserver: bool,
    pub templates: bool,
    pub nesting: Vec<u32>,
    pub bard: bool,
}

impl SetupOptions {
    /// True when no phase flag was given; every phase then runs.
    pub fn all_phases(&self) -> bool {
        !self.database
            && self.geolevels.is_empty()
            && !self.views
            && !self.geoserver
            && !self.templates
            && self.nesting.is_empty()
            && !self.bard
    }

    /// The options actually dispatched. With no phase flags everything
    /// is enabled and the geolevel/nesting lists stay empty, which the
    /// `setup` command reads as "all levels".
    pub fn effective(&self) -> SetupOptions {
        if self.all_phases() {
            SetupOptions {
                database: true,
                views: true,
                geoserver: true,
                templates: true,
                bard: true,
                ..SetupOptions::default()
            }
        } else {
            self.clone()
        }
    }
}

/// Build the argument vector for the `setup` management command.
pub fn setup_args(config_path: &Path, verbosity: u8, options: &SetupOptions) -> Vec<String> {
    let mut args = vec![
        "setup".to_string(),
        format!("--config={}", config_path.display()),
        format!("--verbosity={verbosity}"),
    ];
    for level in &options.geolevels {
        args.push(format!("--geolevel={level}"));
    }
    for level in &options.nesting {
        args.push(format!("--nesting={level}"));
    }
    if options.views {
        args.push("--views".to_string());
    }
    if options.geoserver {
        args.push("--geoserver".to_string());
    }
    if options.templates {
        args.push("--templates".to_string());
    }
    if options.bard {
        args.push("--bard".to_string());
    }
    args
}

/// Runs management commands through the framework's manage script.
pub struct ManageRunner {
    interpreter: PathBuf,
    manage_script: PathBuf,
    settings_module: String,
    verbosity: u8,
}

impl ManageRunner {
    pub fn new(
        interpreter: PathBuf,
        manage_script: PathBuf,
        settings_module: String,
        verbosity: u8,
    ) -> Self {
        Self {
            interpreter,
            manage_script,
            settings_module,
            verbosity,
        }
    }

    /// Locate the Python interpreter on PATH.
    pub fn locate(manage_script: PathBuf, settings_module: String, verbosity: u8) -> Result<Self> {
        let interpreter = which::which("python")
            .or_else(|_| which::which("python3"))
            .context("no python interpreter found on PATH")?;
        Ok(Self::new(
            interpreter,
            manage_script,
            settings_module,
            verbosity,
        ))
    }

    pub fn syncdb(&self) -> Result<()> {
        self.run(&["syncdb".to_string()])
    }

    pub fn setup(&self, config_path: &Path, options: &SetupOptions) -> Result<()> {
        self.run(&setup_args(config_path, self.verbosity, &options.effective()))
    }

    /// Run one management command, streaming its output through unless
    /// verbosity is 0. Non-zero exit terminates the bootstrap.
    fn run(&self, args: &[String]) -> Result<()> {
        let command_name = args.first().map(String::as_str).unwrap_or_default();
        tracing::debug!(command = command_name, ?args, "dispatching management command");

        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.manage_script)
            .args(args)
            .env(SETTINGS_ENV, &self.settings_module);
        if self.verbosity == 0 {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().with_context(|| {
            format!("failed to execute management command '{command_name}'")
        })?;
        if !status.success() {
            bail!("management command '{command_name}' exited with {status}");
        }
        Ok(())
    }
}
