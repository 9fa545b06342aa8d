//! Core types and constants for the interop transformation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value written to `csnInteropEffective`.
pub const INTEROP_VERSION: &str = "1.0";

/// Value written to `meta.flavor`.
pub const FLAVOR: &str = "effective";

/// Version major used when a service name carries no `vN` segment.
pub const DEFAULT_VERSION_MAJOR: &str = "1";

/// Ordered rewrite table of legacy annotations.
///
/// `None` as target drops the annotation. Order matters: when several
/// sources share a target, the first one with a truthy value wins.
pub const ANNOTATION_RULES: &[(&str, Option<&str>)] = &[
    ("@Common.Label", Some("@EndUserText.label")),
    ("@title", Some("@EndUserText.label")),
    ("@label", Some("@EndUserText.label")),
    ("@description", Some("@EndUserText.quickInfo")),
    ("@cds.autoexpose", None),
];

/// Text key to localized string for one locale.
pub type TextMap = Map<String, Value>;

/// Returns true for `@`-prefixed annotation keys.
pub fn is_annotation(key: &str) -> bool {
    key.starts_with('@')
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truthiness as CSN producers understand it: `null`, `false`, `0` and `""`
/// are falsy, everything else (empty containers included) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One localization bundle as handed out by a [`crate::LocaleBundles`] provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocaleBundle {
    /// Locale code, e.g. `de` or `en_US`. `None` or empty marks the default
    /// bundle, which the reducer discards.
    pub locale: Option<String>,
    pub texts: TextMap,
}

impl LocaleBundle {
    /// Create a bundle for a named locale.
    pub fn new(locale: impl Into<String>, texts: TextMap) -> Self {
        Self {
            locale: Some(locale.into()),
            texts,
        }
    }

    /// Create the default (locale-less) bundle.
    pub fn default_bundle(texts: TextMap) -> Self {
        Self {
            locale: None,
            texts,
        }
    }

    /// The locale code if this bundle is bound to a real locale.
    pub fn locale_code(&self) -> Option<&str> {
        self.locale.as_deref().filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("Name")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn annotation_keys() {
        assert!(is_annotation("@title"));
        assert!(is_annotation("@Common.Label"));
        assert!(!is_annotation("kind"));
        assert!(!is_annotation("title@"));
    }

    #[test]
    fn bundle_locale_code() {
        assert_eq!(LocaleBundle::new("de", Map::new()).locale_code(), Some("de"));
        assert_eq!(LocaleBundle::new("", Map::new()).locale_code(), None);
        assert_eq!(LocaleBundle::default_bundle(Map::new()).locale_code(), None);
    }

    #[test]
    fn rules_have_unique_sources() {
        for (i, (source, _)) in ANNOTATION_RULES.iter().enumerate() {
            assert!(is_annotation(source));
            assert!(ANNOTATION_RULES[i + 1..].iter().all(|(s, _)| s != source));
        }
    }
}
