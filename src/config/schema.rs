//! XSD schema validation via libxml2.

use super::error::ConfigError;
use libxml::error::StructuredError;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};
use libxml::tree::Document;
use std::path::Path;

/// Validate `config` against the XSD at `schema_path`.
///
/// Schema compilation failures report against the schema path; a
/// well-formed config that does not conform reports the libxml2
/// violation log.
pub(super) fn validate(schema_path: &Path, config: &Document) -> Result<(), ConfigError> {
    let path_str = schema_path.to_str().ok_or_else(|| ConfigError::Parse {
        path: schema_path.to_path_buf(),
        detail: "non-UTF-8 path".to_string(),
    })?;

    let mut parser = SchemaParserContext::from_file(path_str);
    let mut ctx =
        SchemaValidationContext::from_parser(&mut parser).map_err(|errors| ConfigError::Parse {
            path: schema_path.to_path_buf(),
            detail: format_errors(errors).join("; "),
        })?;

    ctx.validate_document(config)
        .map_err(|errors| ConfigError::SchemaViolation {
            violations: format_errors(errors),
        })?;

    tracing::debug!(schema = %schema_path.display(), "schema validation passed");
    Ok(())
}

fn format_errors(errors: Vec<StructuredError>) -> Vec<String> {
    errors.into_iter().map(|e| format!("{e:?}")).collect()
}
