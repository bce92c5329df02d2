//! BARD report template generation.
//!
//! Applies the configured XSLT to the full configuration document once
//! per legislative body, producing the static HTML shells served by the
//! reporting pages. A body the stylesheet has no content for is the
//! stylesheet's contract: it must emit its own placeholder.

use crate::config::ConfigDocument;
use crate::console::Console;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Stylesheet parameter receiving the current body's identifier.
const BODY_PARAM: &str = "legislativebody";

/// Apply the XSLT at `xslt_path` once per legislative body, writing
/// `bard_<name>.html` (name lowercased) into `output_dir`.
///
/// Errors here terminate the run: a missing or invalid stylesheet and
/// an unwritable output directory are deployment mistakes the operator
/// has to fix.
pub fn generate(
    config: &ConfigDocument,
    xslt_path: &Path,
    output_dir: &Path,
    console: &Console,
) -> Result<Vec<PathBuf>> {
    let xslt_str = xslt_path
        .to_str()
        .ok_or_else(|| anyhow!("non-UTF-8 stylesheet path: {}", xslt_path.display()))?;
    let mut stylesheet = libxslt::parser::parse_file(xslt_str)
        .map_err(|e| anyhow!("could not load stylesheet {}: {e:?}", xslt_path.display()))?;

    let bodies = config
        .nodes("//DistrictBuilder/LegislativeBodies/LegislativeBody")
        .context("could not enumerate legislative bodies")?;

    let mut written = Vec::with_capacity(bodies.len());
    for body in bodies {
        let body_id = body
            .get_attribute("id")
            .ok_or_else(|| anyhow!("legislative body without an id"))?;
        let body_name = body
            .get_attribute("name")
            .ok_or_else(|| anyhow!("legislative body '{body_id}' has no name"))?;

        // Stylesheet parameters are XPath expressions; quote the id so
        // it arrives as a string literal.
        let param = format!("'{body_id}'");
        let result = stylesheet
            .transform(config.document().clone(), vec![(BODY_PARAM, param.as_str())])
            .map_err(|e| anyhow!("transform failed for body '{body_id}': {e:?}"))?;
        let html = stylesheet
            .serialize(&result)
            .map_err(|e| anyhow!("could not serialize report for body '{body_id}': {e:?}"))?;

        let output_path = output_dir.join(format!("bard_{}.html", body_name.to_lowercase()));
        fs::write(&output_path, html)
            .with_context(|| format!("could not write {}", output_path.display()))?;
        console.detail(&format!("wrote {}", output_path.display()));
        written.push(output_path);
    }

    tracing::debug!(count = written.len(), "report templates generated");
    Ok(written)
}
