//! Localization reducer - keeps only the i18n texts a document references.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::bundles::LocaleBundles;
use crate::error::InteropError;
use crate::traverse::{definitions, for_each_annotated};
use crate::types::{is_annotation, TextMap};

fn i18n_ref_regex() -> &'static Regex {
    static I18N_REF: OnceLock<Regex> = OnceLock::new();
    I18N_REF.get_or_init(|| Regex::new(r"^\{i18n>(.+)\}$").expect("valid i18n reference regex"))
}

/// Extract the text key from an exact `{i18n>KEY}` reference.
///
/// Anything around the braces disqualifies the value.
pub fn i18n_key(value: &str) -> Option<&str> {
    i18n_ref_regex()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collect every text key referenced by a string annotation on a definition
/// or entity element.
///
/// # Errors
///
/// Returns `InteropError` if the document has no `definitions` object.
pub fn collect_i18n_refs(csn: &Value) -> Result<BTreeSet<String>, InteropError> {
    let defs = definitions(csn)?;
    let mut refs = BTreeSet::new();
    for_each_annotated(defs, |obj| collect_object_refs(obj, &mut refs));
    Ok(refs)
}

fn collect_object_refs(obj: &Map<String, Value>, refs: &mut BTreeSet<String>) {
    let keys = obj
        .iter()
        .filter(|(key, _)| is_annotation(key))
        .filter_map(|(_, value)| value.as_str())
        .filter_map(i18n_key);
    refs.extend(keys.map(String::from));
}

/// Replace `csn.i18n` with the referenced subset of the provider's bundles.
///
/// Default (locale-less) bundles are discarded, a later bundle for the same
/// locale replaces an earlier one, and locales left without texts are dropped.
/// `i18n` is always written, possibly as `{}`.
///
/// # Errors
///
/// Returns `InteropError` if the document has no `definitions` object or the
/// provider fails.
pub fn reduce_i18n<B>(csn: &mut Value, bundles: &B) -> Result<(), InteropError>
where
    B: LocaleBundles + ?Sized,
{
    let refs = collect_i18n_refs(csn)?;

    let mut i18n: Map<String, Value> = Map::new();
    let mut total = 0usize;
    for bundle in bundles.bundles(csn)? {
        total += 1;
        let Some(locale) = bundle.locale_code() else {
            continue;
        };
        i18n.insert(locale.to_string(), Value::Object(bundle.texts));
    }

    i18n.retain(|locale, texts| {
        let Value::Object(texts) = texts else {
            return false;
        };
        retain_referenced(texts, &refs);
        if texts.is_empty() {
            tracing::debug!(%locale, "dropping locale without referenced texts");
        }
        !texts.is_empty()
    });

    tracing::debug!(
        bundles = total,
        references = refs.len(),
        locales = i18n.len(),
        "reduced i18n"
    );

    if let Value::Object(doc) = csn {
        doc.insert("i18n".to_string(), Value::Object(i18n));
    }
    Ok(())
}

fn retain_referenced(texts: &mut TextMap, refs: &BTreeSet<String>) {
    texts.retain(|key, _| refs.contains(key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::NoBundles;
    use crate::types::LocaleBundle;
    use serde_json::json;

    fn texts(value: Value) -> TextMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn i18n_key_exact_match() {
        assert_eq!(i18n_key("{i18n>Books}"), Some("Books"));
        assert_eq!(i18n_key("{i18n>Books.title}"), Some("Books.title"));
        assert_eq!(i18n_key("see {i18n>Books}"), None);
        assert_eq!(i18n_key("{i18n>Books} "), None);
        assert_eq!(i18n_key("{i18n>}"), None);
        assert_eq!(i18n_key("{i18n:Books}"), None);
        assert_eq!(i18n_key("Books"), None);
    }

    #[test]
    fn collects_from_definitions_and_entity_elements() {
        let csn = json!({
            "definitions": {
                "CatalogService": {
                    "kind": "service",
                    "@title": "{i18n>Catalog}"
                },
                "CatalogService.Books": {
                    "kind": "entity",
                    "@title": "{i18n>Books}",
                    "title": "{i18n>NotAnAnnotation}",
                    "elements": {
                        "author": { "@title": "{i18n>Author}" },
                        "stock": { "@title": "Stock" }
                    }
                },
                "CatalogService.Type": {
                    "kind": "type",
                    "elements": { "x": { "@title": "{i18n>Hidden}" } }
                }
            }
        });

        let refs = collect_i18n_refs(&csn).unwrap();
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        assert_eq!(refs, vec!["Author", "Books", "Catalog"]);
    }

    #[test]
    fn ignores_structured_values() {
        let csn = json!({
            "definitions": {
                "S.E": {
                    "kind": "entity",
                    "@UI.LineItem": [{ "Label": "{i18n>Nested}" }],
                    "@UI.HeaderInfo": { "TypeName": "{i18n>Header}" },
                    "@Core.Computed": true
                }
            }
        });
        assert!(collect_i18n_refs(&csn).unwrap().is_empty());
    }

    #[test]
    fn filters_texts_and_drops_empty_locales() {
        let mut csn = json!({
            "definitions": {
                "S.Books": { "kind": "entity", "@title": "{i18n>Books}" }
            }
        });
        let bundles = vec![
            LocaleBundle::default_bundle(texts(json!({ "Books": "Books" }))),
            LocaleBundle::new("de", texts(json!({ "Books": "Bücher", "Unused": "x" }))),
            LocaleBundle::new("fr", texts(json!({ "Unused": "y" }))),
        ];

        reduce_i18n(&mut csn, &bundles).unwrap();
        assert_eq!(csn["i18n"], json!({ "de": { "Books": "Bücher" } }));
    }

    #[test]
    fn empty_locale_string_is_default_bundle() {
        let mut csn = json!({
            "definitions": { "S": { "kind": "service", "@title": "{i18n>S}" } }
        });
        let bundles = vec![LocaleBundle::new("", texts(json!({ "S": "Service" })))];
        reduce_i18n(&mut csn, &bundles).unwrap();
        assert_eq!(csn["i18n"], json!({}));
    }

    #[test]
    fn replaces_existing_i18n() {
        let mut csn = json!({
            "definitions": {},
            "i18n": { "de": { "Old": "Alt" } }
        });
        reduce_i18n(&mut csn, &NoBundles).unwrap();
        assert_eq!(csn["i18n"], json!({}));
    }

    #[test]
    fn missing_definitions_leaves_document_untouched() {
        let mut csn = json!({ "meta": {} });
        let err = reduce_i18n(&mut csn, &NoBundles).unwrap_err();
        assert!(matches!(err, InteropError::MissingDefinitions));
        assert_eq!(csn, json!({ "meta": {} }));
    }
}
