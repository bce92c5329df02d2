//! Configuration document loading and validation.
//!
//! The pipeline is strictly ordered: both files must exist and parse,
//! the document must conform to the XSD, and only then are ID/REF
//! cross-references checked. The first failure wins.

mod error;
mod refs;
mod schema;

pub use error::ConfigError;

use crate::console::Console;
use libxml::parser::Parser;
use libxml::tree::{Document, Node};
use libxml::xpath;
use std::path::Path;

/// A parsed, validated configuration document.
///
/// Wraps the libxml2 document and exposes the XPath lookups the
/// settings and report generators need.
pub struct ConfigDocument {
    doc: Document,
}

impl ConfigDocument {
    /// Parse a configuration document from a string, skipping schema and
    /// referential validation. Intended for tests and tooling that build
    /// documents programmatically; the CLI always goes through
    /// [`load_and_validate`].
    pub fn from_xml_str(xml: &str) -> Result<Self, ConfigError> {
        let doc = Parser::default()
            .parse_string(xml)
            .map_err(|e| ConfigError::Parse {
                path: Path::new("<string>").to_path_buf(),
                detail: format!("{e:?}"),
            })?;
        Ok(Self { doc })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Evaluate an XPath expression over the whole document.
    pub fn nodes(&self, expr: &str) -> Result<Vec<Node>, ConfigError> {
        let ctx = xpath::Context::new(&self.doc)
            .map_err(|e| ConfigError::XPath(format!("context creation failed: {e:?}")))?;
        Ok(ctx
            .evaluate(expr)
            .map_err(|e| ConfigError::XPath(format!("invalid expression '{expr}': {e:?}")))?
            .get_nodes_as_vec())
    }

    /// First node matching the expression, if any.
    pub fn first(&self, expr: &str) -> Result<Option<Node>, ConfigError> {
        Ok(self.nodes(expr)?.into_iter().next())
    }
}

/// Load the configuration at `config_path` and validate it against the
/// XSD at `schema_path`, then cross-check ID/REF integrity for the
/// `LegislativeBody` and `Subject` tag families.
pub fn load_and_validate(
    schema_path: &Path,
    config_path: &Path,
    console: &Console,
) -> Result<ConfigDocument, ConfigError> {
    // libxml errors unhelpfully on missing files, so check up front.
    if !schema_path.exists() {
        return Err(ConfigError::MissingFile(schema_path.to_path_buf()));
    }
    if !config_path.exists() {
        return Err(ConfigError::MissingFile(config_path.to_path_buf()));
    }

    // Parse the schema as plain XML first so a malformed schema file
    // reports as a parse failure rather than a compile failure.
    parse_file(schema_path)?;
    let doc = parse_file(config_path)?;

    schema::validate(schema_path, &doc)?;
    console.step("Configuration is parsed and validated.");

    let config = ConfigDocument { doc };
    refs::check(&config, "LegislativeBody")?;
    refs::check(&config, "Subject")?;
    console.step("Document validated.");

    Ok(config)
}

fn parse_file(path: &Path) -> Result<Document, ConfigError> {
    let path_str = path.to_str().ok_or_else(|| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: "non-UTF-8 path".to_string(),
    })?;
    Parser::default()
        .parse_file(path_str)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}
