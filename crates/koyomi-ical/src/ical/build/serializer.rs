//! Serialization: component tree → canonical line-folded text.

use super::CRLF;
use super::fold::fold_line;
use crate::error::SerializeError;
use crate::ical::core::Component;
use crate::ical::registry::default_registry;

/// Serializes a component tree.
///
/// Refuses to serialize unless the tree validates. REQUIRED properties that
/// are absent but have an intrinsic default are materialized first — the
/// tree is mutated as a side effect of serialization.
///
/// ## Errors
///
/// [`SerializeError::NotValid`] when [`Component::is_valid`] does not hold;
/// run validation separately for the detailed reason.
pub fn serialize(component: &mut Component) -> Result<String, SerializeError> {
    if !component.is_valid() {
        return Err(SerializeError::NotValid);
    }
    let mut out = String::new();
    write_component(component, &mut out);
    Ok(out)
}

impl Component {
    /// Serializes this subtree; see [`serialize`].
    ///
    /// ## Errors
    ///
    /// [`SerializeError::NotValid`] when the subtree does not validate.
    pub fn serialize(&mut self) -> Result<String, SerializeError> {
        serialize(self)
    }
}

fn write_component(component: &mut Component, out: &mut String) {
    fill_defaults(component);

    push_folded(out, &format!("BEGIN:{}", component.kind()));
    for (_, instances) in component.property_groups() {
        for property in instances {
            out.push_str(&property.serialize());
        }
    }
    for group in &mut component.children {
        for child in &mut group.instances {
            write_component(child, out);
        }
    }
    push_folded(out, &format!("END:{}", component.kind()));
}

/// Materializes defaults for absent REQUIRED properties.
fn fill_defaults(component: &mut Component) {
    let kind = component.kind();
    let missing: Vec<&'static str> = kind
        .schema()
        .properties
        .iter()
        .filter(|(name, cardinality)| cardinality.required && component.property(name).is_none())
        .map(|(name, _)| *name)
        .collect();

    for name in missing {
        let has_default = default_registry()
            .instantiate(name, kind)
            .is_some_and(|p| p.default_value().is_some());
        if has_default
            && let Err(err) = component.add_property(name, None, &[])
        {
            // Validation passed before this point, so a default that fails
            // to apply is a registry/schema mismatch worth surfacing.
            tracing::warn!(property = name, %err, "failed to materialize default");
        }
    }
}

fn push_folded(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str(CRLF);
}
