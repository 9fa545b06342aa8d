//! Annotation mapper - rewrites legacy annotations to their interop names.

use serde_json::{Map, Value};

use crate::error::InteropError;
use crate::traverse::{definitions_mut, for_each_annotated_mut};
use crate::types::{is_truthy, ANNOTATION_RULES};

/// Rewrite legacy annotations on every definition and entity element.
///
/// See [`map_object_annotations`] for the per-object rules.
///
/// # Errors
///
/// Returns `InteropError` if the document has no `definitions` object.
pub fn map_annotations(csn: &mut Value) -> Result<(), InteropError> {
    let defs = definitions_mut(csn)?;
    let mut rewritten = 0usize;
    for_each_annotated_mut(defs, |obj| rewritten += map_object_annotations(obj));
    tracing::debug!(rewritten, "mapped annotations");
    Ok(())
}

/// Apply [`ANNOTATION_RULES`] in order to one definition or element.
///
/// A legacy annotation is always removed. Its value moves to the target only
/// when the target does not already hold a truthy value, so the first source
/// with a truthy value wins and existing targets are never overwritten.
///
/// Returns the number of legacy annotations removed.
pub fn map_object_annotations(obj: &mut Map<String, Value>) -> usize {
    let mut removed = 0;
    for (source, target) in ANNOTATION_RULES {
        let Some(value) = obj.shift_remove(*source) else {
            continue;
        };
        removed += 1;
        let Some(target) = target else {
            continue;
        };
        if !obj.get(*target).is_some_and(is_truthy) {
            obj.insert((*target).to_string(), value);
        }
    }
    removed
}
