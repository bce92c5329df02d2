//! ID/REF cross-reference checking.
//!
//! The XSD cannot express that every `ref` attribute must name an `id`
//! defined on an element of the same tag elsewhere in the document, so
//! this pass runs after schema validation.

use super::{ConfigDocument, ConfigError};

/// Verify that every `<tag ref="...">` resolves to some `<tag id="...">`.
///
/// Existence scan over every ref/id pair; configuration documents are
/// small enough that the quadratic walk does not matter.
pub(super) fn check(config: &ConfigDocument, tag: &'static str) -> Result<(), ConfigError> {
    let refs = config.nodes(&format!("//{tag}[@ref]"))?;
    let ids = config.nodes(&format!("//{tag}[@id]"))?;

    for ref_node in &refs {
        let reference = ref_node.get_attribute("ref").unwrap_or_default();
        let found = ids
            .iter()
            .any(|id_node| id_node.get_attribute("id").as_deref() == Some(reference.as_str()));
        if !found {
            return Err(ConfigError::DanglingRef { tag, reference });
        }
    }

    tracing::debug!(tag, refs = refs.len(), ids = ids.len(), "cross-references resolved");
    Ok(())
}
