use anyhow::Result;
use clap::Parser;
use district_setup::config;
use district_setup::console::{Console, Verbosity};
use district_setup::manage::{ManageRunner, SetupOptions};
use district_setup::{reports, settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Settings template consumed by the generator, relative to the working directory.
const SETTINGS_TEMPLATE: &str = "settings.py.in";

/// Generated settings file, overwritten on every run.
const SETTINGS_OUTPUT: &str = "settings.py";

#[derive(Parser)]
#[command(name = "district-setup")]
#[command(about = "Validate a redistricting configuration and bootstrap the web application", long_about = None)]
struct Cli {
    /// Path to the XSD validation schema
    schema: PathBuf,

    /// Path to the XML configuration file
    config: PathBuf,

    /// Generate the database schema
    #[arg(short = 'd', long)]
    database: bool,

    /// Import the geography from the Nth geolevel (repeatable)
    #[arg(short = 'g', long = "geolevel", value_name = "N")]
    geolevels: Vec<u32>,

    /// Create database views based on all geographies
    #[arg(short = 'V', long)]
    views: bool,

    /// Create spatial data layers in Geoserver
    #[arg(short = 'G', long)]
    geoserver: bool,

    /// Create the system-wide templates
    #[arg(short = 't', long)]
    templates: bool,

    /// Enforce nested geometries for the Nth geolevel (repeatable)
    #[arg(short = 'n', long = "nesting", value_name = "N")]
    nesting: Vec<u32>,

    /// Create a BARD map based on the imported spatial data
    #[arg(short = 'b', long)]
    bard: bool,

    /// Verbosity level; 0=no output, 1=normal output, 2=all output
    #[arg(short = 'v', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    verbosity: u8,

    /// Path to the framework's manage script
    #[arg(long, default_value = "manage.py", value_name = "PATH")]
    manage: PathBuf,

    /// Settings module handed to management commands
    #[arg(long, default_value = "publicmapping.settings", value_name = "MODULE")]
    settings_module: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_level(cli.verbosity);
    init_tracing(verbosity);

    let console = Console::new(verbosity);
    match run(&cli, &console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            console.failure(&error);
            ExitCode::FAILURE
        }
    }
}

/// Run the bootstrap pipeline: validate, generate settings and report
/// templates, then hand off to the framework's management commands.
fn run(cli: &Cli, console: &Console) -> Result<()> {
    let config = config::load_and_validate(&cli.schema, &cli.config, console)?;

    let reports_config = settings::generate(
        &config,
        Path::new(SETTINGS_TEMPLATE),
        Path::new(SETTINGS_OUTPUT),
    )?;
    console.step("Generated framework settings.");

    if let Some(reports_config) = &reports_config {
        let written = reports::generate(
            &config,
            &reports_config.transform,
            &reports_config.template_dir,
            console,
        )?;
        console.step(&format!(
            "Generated {} report template{}.",
            written.len(),
            if written.len() == 1 { "" } else { "s" }
        ));
    }

    let options = SetupOptions {
        database: cli.database,
        geolevels: cli.geolevels.clone(),
        views: cli.views,
        geoserver: cli.geoserver,
        templates: cli.templates,
        nesting: cli.nesting.clone(),
        bard: cli.bard,
    };

    let runner = ManageRunner::locate(
        cli.manage.clone(),
        cli.settings_module.clone(),
        cli.verbosity,
    )?;
    if options.all_phases() || options.database {
        runner.syncdb()?;
    }
    runner.setup(&cli.config, &options)?;

    Ok(())
}

fn init_tracing(verbosity: Verbosity) {
    let default_filter = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
