//! CSN Interop
//!
//! Transforms an effective CSN document into its interop variant.
//!
//! The transformation runs three stages over the same document:
//!
//! 1. **i18n reduction**: bundles from a [`LocaleBundles`] provider are stored
//!    under `i18n`, keeping only the texts referenced as `{i18n>KEY}` by an
//!    annotation of a definition or entity element.
//! 2. **Annotation mapping**: legacy annotations are renamed to their interop
//!    counterparts or dropped.
//! 3. **Metadata derivation**: `csnInteropEffective` and `meta` are stamped;
//!    name, namespace and version come from the single service, if any.
//!
//! # Example
//!
//! ```
//! use csn_interop::{to_interop, LocaleBundle};
//! use serde_json::json;
//!
//! let mut csn = json!({
//!     "definitions": {
//!         "com.example.CatalogService.v2": { "kind": "service" },
//!         "com.example.CatalogService.v2.Books": {
//!             "kind": "entity",
//!             "@title": "{i18n>Books}",
//!             "elements": { "ID": { "@Common.Label": "ID" } }
//!         }
//!     }
//! });
//!
//! let texts = json!({ "Books": "Bücher", "Authors": "Autoren" });
//! let bundles = vec![LocaleBundle::new("de", texts.as_object().unwrap().clone())];
//!
//! to_interop(&mut csn, &bundles).unwrap();
//!
//! assert_eq!(csn["i18n"], json!({ "de": { "Books": "Bücher" } }));
//! assert_eq!(
//!     csn["definitions"]["com.example.CatalogService.v2.Books"]["@EndUserText.label"],
//!     "{i18n>Books}"
//! );
//! assert_eq!(csn["meta"]["__name"], "CatalogService");
//! assert_eq!(csn["meta"]["document"]["version"], "2.0.0");
//! ```
//!
//! # Annotation Rules
//!
//! | Legacy | Interop |
//! |--------|---------|
//! | `@Common.Label` | `@EndUserText.label` |
//! | `@title` | `@EndUserText.label` |
//! | `@label` | `@EndUserText.label` |
//! | `@description` | `@EndUserText.quickInfo` |
//! | `@cds.autoexpose` | (removed) |
//!
//! An existing truthy target is never overwritten; the legacy key is removed
//! either way.

mod annotations;
mod bundles;
mod error;
mod i18n;
mod loader;
mod meta;
mod pipeline;
mod traverse;
mod types;

pub use annotations::{map_annotations, map_object_annotations};
pub use bundles::{
    bundles_from_fn, parse_properties, FromFn, I18nFolder, LocaleBundles, NoBundles,
    DEFAULT_BASENAME,
};
pub use error::InteropError;
pub use i18n::{collect_i18n_refs, i18n_key, reduce_i18n};
pub use loader::{is_url, load_csn, load_csn_auto, load_csn_str};
pub use meta::{derive_meta, parse_service_name, ServiceName};
pub use pipeline::to_interop;
pub use types::{
    is_annotation, is_truthy, LocaleBundle, TextMap, ANNOTATION_RULES, DEFAULT_VERSION_MAJOR,
    FLAVOR, INTEROP_VERSION,
};

#[cfg(feature = "remote")]
pub use loader::load_csn_url;
