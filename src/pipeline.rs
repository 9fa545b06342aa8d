//! The full effective-to-interop pipeline.

use serde_json::Value;

use crate::annotations::map_annotations;
use crate::bundles::LocaleBundles;
use crate::error::InteropError;
use crate::i18n::reduce_i18n;
use crate::meta::derive_meta;

/// Transform an effective CSN document into its interop variant in place.
///
/// Runs the localization reducer, the annotation mapper and the metadata
/// deriver in that order. References are collected before legacy
/// annotations are mapped, so texts of a dropped legacy annotation are kept.
///
/// # Errors
///
/// Returns `InteropError` if the document has no `definitions` object or the
/// bundle provider fails. The document is left unchanged by the stage that
/// failed.
pub fn to_interop<B>(csn: &mut Value, bundles: &B) -> Result<(), InteropError>
where
    B: LocaleBundles + ?Sized,
{
    let span = tracing::debug_span!("to_interop");
    let _enter = span.enter();

    reduce_i18n(csn, bundles)?;
    map_annotations(csn)?;
    derive_meta(csn)?;
    Ok(())
}
