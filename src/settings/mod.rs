//! Framework settings generation.
//!
//! Copies the settings template and appends a section derived from the
//! validated configuration document. The output file is rewritten from
//! scratch on every run; on an unchanged config only the secret key
//! differs between runs.

mod secret;

pub use secret::generate_secret_key;

use crate::config::{ConfigDocument, ConfigError};
use libxml::tree::Node;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_SESSION_QUOTA: i64 = 5;
const DEFAULT_SESSION_TIMEOUT: i64 = 15;
const DEFAULT_MAX_UPLOAD_KB: i64 = 5000;
const DEFAULT_MAX_UNDOS: i64 = 0;
const DEFAULT_LEADERBOARD_RANKED: i64 = 10;

/// Failure modes of settings generation, one per failing step.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings template not found: {0}")]
    TemplateMissing(PathBuf),

    #[error("could not read settings template {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration has no <{0}> element")]
    MissingElement(&'static str),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("attribute '{attribute}' on <{element}> is not an integer: '{value}'")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("could not write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Report-template generation inputs, present when the configuration
/// carries a BARD reporting section.
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// XSLT file named by `BardConfig@transform`.
    pub transform: PathBuf,
    /// Directory the HTML report templates are written into.
    pub template_dir: PathBuf,
}

/// Generate the settings file at `output_path` from the template at
/// `template_path` plus values derived from `config`.
///
/// Returns the report generation inputs when a `BardConfig` is present;
/// `None` means reporting is disabled and template generation must be
/// skipped.
pub fn generate(
    config: &ConfigDocument,
    template_path: &Path,
    output_path: &Path,
) -> Result<Option<ReportsConfig>, SettingsError> {
    if !template_path.exists() {
        return Err(SettingsError::TemplateMissing(template_path.to_path_buf()));
    }
    let template = fs::read_to_string(template_path).map_err(|source| {
        SettingsError::TemplateRead {
            path: template_path.to_path_buf(),
            source,
        }
    })?;

    let mut out = template;
    let reports = append_generated_section(config, &mut out)?;

    fs::write(output_path, out).map_err(|source| SettingsError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    tracing::debug!(output = %output_path.display(), reports = reports.is_some(), "settings written");
    Ok(reports)
}

/// Append the generated settings section to `out`, mirroring the layout
/// the framework expects. Ordering is fixed so re-runs are
/// byte-identical apart from the secret key.
fn append_generated_section(
    config: &ConfigDocument,
    out: &mut String,
) -> Result<Option<ReportsConfig>, SettingsError> {
    out.push_str("\n#\n# Automatically generated settings.\n#\n");

    let database = require_element(config, "//Project/Database", "Database")?;
    out.push_str("DATABASE_ENGINE = 'postgresql_psycopg2'\n");
    out.push_str(&format!(
        "DATABASE_NAME = '{}'\n",
        require_attr(&database, "Database", "name")?
    ));
    out.push_str(&format!(
        "DATABASE_USER = '{}'\n",
        require_attr(&database, "Database", "user")?
    ));
    out.push_str(&format!(
        "DATABASE_PASSWORD = '{}'\n",
        require_attr(&database, "Database", "password")?
    ));
    out.push_str(&format!(
        "DATABASE_HOST = '{}'\n",
        database.get_attribute("host").unwrap_or_default()
    ));

    let map_server = require_element(config, "//MapServer", "MapServer")?;
    out.push_str(&format!(
        "\nMAP_SERVER = '{}'\n",
        require_attr(&map_server, "MapServer", "hostname")?
    ));
    if let Some(protocol) = map_server.get_attribute("protocol") {
        out.push_str(&format!("MAP_SERVER_PROTOCOL = '{protocol}'\n"));
    }
    out.push_str(&format!(
        "BASE_MAPS = '{}'\n",
        require_attr(&map_server, "MapServer", "basemaps")?
    ));
    out.push_str(&format!(
        "MAP_SERVER_NS = '{}'\n",
        require_attr(&map_server, "MapServer", "ns")?
    ));
    out.push_str(&format!(
        "MAP_SERVER_NSHREF = '{}'\n",
        require_attr(&map_server, "MapServer", "nshref")?
    ));
    out.push_str(&format!(
        "FEATURE_LIMIT = {}\n",
        require_int_attr(&map_server, "MapServer", "maxfeatures")?
    ));

    let admin = require_element(config, "//Admin", "Admin")?;
    out.push_str(&format!(
        "\nADMINS = (\n  ('{}',\n  '{}'),\n)",
        require_attr(&admin, "Admin", "user")?,
        require_attr(&admin, "Admin", "email")?
    ));
    out.push_str("\nMANAGERS = ADMINS\n");

    let mailer = require_element(config, "//Mailer", "Mailer")?;
    out.push_str(&format!(
        "\nEMAIL_HOST = '{}'\n",
        require_attr(&mailer, "Mailer", "server")?
    ));
    out.push_str(&format!(
        "EMAIL_PORT = {}\n",
        require_int_attr(&mailer, "Mailer", "port")?
    ));
    out.push_str(&format!(
        "EMAIL_HOST_USER = '{}'\n",
        require_attr(&mailer, "Mailer", "username")?
    ));
    out.push_str(&format!(
        "EMAIL_HOST_PASSWORD = '{}'\n",
        require_attr(&mailer, "Mailer", "password")?
    ));
    out.push_str(&format!(
        "EMAIL_SUBJECT_PREFIX = '{} '\n",
        require_attr(&mailer, "Mailer", "prefix")?
    ));

    out.push_str(&format!("\nSECRET_KEY = '{}'\n", generate_secret_key()));

    let project = require_element(config, "//Project", "Project")?;
    let root = require_attr(&project, "Project", "root")?;
    out.push_str(&format!(
        "\nMEDIA_ROOT = '{root}/django/publicmapping/site-media/'\n"
    ));
    out.push_str(&format!(
        "\nSTATIC_ROOT = '{root}/django/publicmapping/static-media/'\n"
    ));
    out.push_str(&format!(
        "\nTEMPLATE_DIRS = (\n  '{root}/django/publicmapping/templates',\n)\n"
    ));
    out.push_str(&format!("\nSLD_ROOT = '{root}/sld/'\n"));

    out.push_str(&format!(
        "\nCONCURRENT_SESSIONS = {}\n",
        optional_int_attr(&project, "Project", "sessionquota", DEFAULT_SESSION_QUOTA)?
    ));
    out.push_str(&format!(
        "\nSESSION_TIMEOUT = {}\n",
        optional_int_attr(&project, "Project", "sessiontimeout", DEFAULT_SESSION_TIMEOUT)?
    ));
    if let Some(banner) = project.get_attribute("bannerimage") {
        out.push_str(&format!("\nBANNER_IMAGE = '{banner}'\n"));
    }

    let reports = match config.first("//Reporting/BardConfigs/BardConfig")? {
        Some(bard) => {
            out.push_str("\nREPORTS_ENABLED = True\n");
            out.push_str(&format!(
                "\nBARD_BASESHAPE = '{}'\n",
                require_attr(&bard, "BardConfig", "shape")?
            ));
            out.push_str(&format!(
                "BARD_TEMP = '{}'\n",
                require_attr(&bard, "BardConfig", "temp")?
            ));
            Some(ReportsConfig {
                transform: PathBuf::from(require_attr(&bard, "BardConfig", "transform")?),
                template_dir: PathBuf::from(format!(
                    "{root}/django/publicmapping/redistricting/templates"
                )),
            })
        }
        None => {
            out.push_str("\nREPORTS_ENABLED = False\n");
            None
        }
    };

    match config.first("//GoogleAnalytics")? {
        Some(analytics) => {
            out.push_str(&format!(
                "\nGA_ACCOUNT = '{}'\n",
                require_attr(&analytics, "GoogleAnalytics", "account")?
            ));
            out.push_str(&format!(
                "GA_DOMAIN = '{}'\n",
                require_attr(&analytics, "GoogleAnalytics", "domain")?
            ));
        }
        None => out.push_str("\nGA_ACCOUNT = None\nGA_DOMAIN = None\n"),
    }

    let max_upload = match config.first("//Upload")? {
        Some(upload) => require_int_attr(&upload, "Upload", "maxsize")?,
        None => DEFAULT_MAX_UPLOAD_KB,
    };
    out.push_str(&format!("\nMAX_UPLOAD_SIZE = {max_upload} * 1024\n"));

    let (during_edit, after_edit) = match config.first("//MaxUndos")? {
        Some(undos) => (
            optional_int_attr(&undos, "MaxUndos", "duringedit", DEFAULT_MAX_UNDOS)?,
            optional_int_attr(&undos, "MaxUndos", "afteredit", DEFAULT_MAX_UNDOS)?,
        ),
        None => (DEFAULT_MAX_UNDOS, DEFAULT_MAX_UNDOS),
    };
    out.push_str(&format!("\nMAX_UNDOS_DURING_EDIT = {during_edit}\n"));
    out.push_str(&format!("\nMAX_UNDOS_AFTER_EDIT = {after_edit}\n"));

    let max_ranked = match config.first("//Leaderboard")? {
        Some(leaderboard) => optional_int_attr(
            &leaderboard,
            "Leaderboard",
            "maxranked",
            DEFAULT_LEADERBOARD_RANKED,
        )?,
        None => DEFAULT_LEADERBOARD_RANKED,
    };
    out.push_str(&format!("\nLEADERBOARD_MAX_RANKED = {max_ranked}\n"));

    Ok(reports)
}

fn require_element(
    config: &ConfigDocument,
    expr: &str,
    element: &'static str,
) -> Result<Node, SettingsError> {
    config
        .first(expr)?
        .ok_or(SettingsError::MissingElement(element))
}

fn require_attr(
    node: &Node,
    element: &'static str,
    attribute: &'static str,
) -> Result<String, SettingsError> {
    node.get_attribute(attribute)
        .ok_or(SettingsError::MissingAttribute { element, attribute })
}

fn require_int_attr(
    node: &Node,
    element: &'static str,
    attribute: &'static str,
) -> Result<i64, SettingsError> {
    let value = require_attr(node, element, attribute)?;
    parse_int(&value, element, attribute)
}

/// Absent attribute falls back to the default; a present but
/// non-integer value is still an error.
fn optional_int_attr(
    node: &Node,
    element: &'static str,
    attribute: &'static str,
    default: i64,
) -> Result<i64, SettingsError> {
    match node.get_attribute(attribute) {
        Some(value) => parse_int(&value, element, attribute),
        None => Ok(default),
    }
}

fn parse_int(
    value: &str,
    element: &'static str,
    attribute: &'static str,
) -> Result<i64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidAttribute {
            element,
            attribute,
            value: value.to_string(),
        })
}
