//! Shared walk over the annotated objects of a CSN document.
//!
//! Annotated objects are every definition plus, for entities, every element.
//! Non-object definitions and elements are skipped.

use serde_json::{Map, Value};

use crate::error::InteropError;
use crate::types::json_type_name;

/// Borrow the `definitions` map of a document.
pub(crate) fn definitions(csn: &Value) -> Result<&Map<String, Value>, InteropError> {
    match csn.get("definitions") {
        Some(Value::Object(defs)) => Ok(defs),
        Some(other) => Err(InteropError::InvalidDefinitions {
            actual: json_type_name(other).to_string(),
        }),
        None => Err(InteropError::MissingDefinitions),
    }
}

/// Mutably borrow the `definitions` map of a document.
pub(crate) fn definitions_mut(csn: &mut Value) -> Result<&mut Map<String, Value>, InteropError> {
    match csn.get_mut("definitions") {
        Some(Value::Object(defs)) => Ok(defs),
        Some(other) => Err(InteropError::InvalidDefinitions {
            actual: json_type_name(other).to_string(),
        }),
        None => Err(InteropError::MissingDefinitions),
    }
}

pub(crate) fn has_kind(def: &Map<String, Value>, kind: &str) -> bool {
    def.get("kind").and_then(Value::as_str) == Some(kind)
}

/// Visit every definition and entity element.
pub(crate) fn for_each_annotated<F>(defs: &Map<String, Value>, mut f: F)
where
    F: FnMut(&Map<String, Value>),
{
    for def in defs.values().filter_map(Value::as_object) {
        f(def);
        if !has_kind(def, "entity") {
            continue;
        }
        if let Some(Value::Object(elements)) = def.get("elements") {
            for element in elements.values().filter_map(Value::as_object) {
                f(element);
            }
        }
    }
}

/// Visit every definition and entity element mutably.
pub(crate) fn for_each_annotated_mut<F>(defs: &mut Map<String, Value>, mut f: F)
where
    F: FnMut(&mut Map<String, Value>),
{
    for def in defs.values_mut().filter_map(Value::as_object_mut) {
        let is_entity = has_kind(def, "entity");
        f(def);
        if !is_entity {
            continue;
        }
        if let Some(Value::Object(elements)) = def.get_mut("elements") {
            for element in elements.values_mut().filter_map(Value::as_object_mut) {
                f(element);
            }
        }
    }
}
