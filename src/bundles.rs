//! Locale bundle providers.
//!
//! The reducer asks a [`LocaleBundles`] provider for every bundle relevant to
//! a document. Providers can be static tables, closures, or an i18n folder on
//! disk laid out the CAP way:
//!
//! ```text
//! _i18n/
//!   i18n.json            { "": {...}, "de": {...} }
//!   i18n.properties      default bundle
//!   i18n_de.properties
//!   i18n_en_US.properties
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::InteropError;
use crate::types::{json_type_name, LocaleBundle, TextMap};

/// Default file basename of i18n bundles.
pub const DEFAULT_BASENAME: &str = "i18n";

/// Source of localization bundles for a document.
pub trait LocaleBundles {
    /// Return all bundles for `csn` in precedence order (later bundles for the
    /// same locale replace earlier ones).
    ///
    /// # Errors
    ///
    /// Providers backed by IO report read and parse failures.
    fn bundles(&self, csn: &Value) -> Result<Vec<LocaleBundle>, InteropError>;
}

/// Provider that has no bundles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundles;

impl LocaleBundles for NoBundles {
    fn bundles(&self, _csn: &Value) -> Result<Vec<LocaleBundle>, InteropError> {
        Ok(Vec::new())
    }
}

impl LocaleBundles for [LocaleBundle] {
    fn bundles(&self, _csn: &Value) -> Result<Vec<LocaleBundle>, InteropError> {
        Ok(self.to_vec())
    }
}

impl LocaleBundles for Vec<LocaleBundle> {
    fn bundles(&self, csn: &Value) -> Result<Vec<LocaleBundle>, InteropError> {
        self.as_slice().bundles(csn)
    }
}

/// Provider backed by a lookup closure. Build with [`bundles_from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<F> LocaleBundles for FromFn<F>
where
    F: Fn(&Value) -> Vec<LocaleBundle>,
{
    fn bundles(&self, csn: &Value) -> Result<Vec<LocaleBundle>, InteropError> {
        Ok((self.0)(csn))
    }
}

/// Wrap a lookup closure as a bundle provider.
///
/// ```
/// use csn_interop::{bundles_from_fn, LocaleBundle};
///
/// let provider = bundles_from_fn(|_csn| vec![LocaleBundle::new("de", Default::default())]);
/// # let _ = provider;
/// ```
pub fn bundles_from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&Value) -> Vec<LocaleBundle>,
{
    FromFn(f)
}

/// Provider reading a CAP-style i18n folder.
///
/// `<basename>.json` is read first, then `<basename>.properties` and
/// `<basename>_<locale>.properties` in file-name order. A missing folder
/// yields no bundles.
#[derive(Debug, Clone)]
pub struct I18nFolder {
    dir: PathBuf,
    basename: String,
}

impl I18nFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            basename: DEFAULT_BASENAME.to_string(),
        }
    }

    /// Use a different file basename (default `i18n`).
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load(&self) -> Result<Vec<LocaleBundle>, InteropError> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "i18n folder not found");
            return Ok(Vec::new());
        }

        let mut bundles = Vec::new();

        let json_path = self.dir.join(format!("{}.json", self.basename));
        if json_path.is_file() {
            bundles.extend(load_json_bundles(&json_path)?);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| InteropError::ReadError {
            path: self.dir.clone(),
            source,
        })?;

        let mut properties: Vec<(Option<String>, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| InteropError::ReadError {
                path: self.dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(locale) = self.properties_locale(file_name) {
                properties.push((locale, entry.path()));
            }
        }
        properties.sort_by(|a, b| a.1.cmp(&b.1));

        for (locale, path) in properties {
            let content =
                std::fs::read_to_string(&path).map_err(|source| InteropError::ReadError {
                    path: path.clone(),
                    source,
                })?;
            bundles.push(LocaleBundle {
                locale,
                texts: parse_properties(&content),
            });
        }

        tracing::debug!(
            dir = %self.dir.display(),
            bundles = bundles.len(),
            "loaded i18n folder"
        );
        Ok(bundles)
    }

    /// Match `<basename>.properties` (default bundle, `Some(None)`) or
    /// `<basename>_<locale>.properties` (`Some(Some(locale))`).
    fn properties_locale(&self, file_name: &str) -> Option<Option<String>> {
        let stem = file_name.strip_suffix(".properties")?;
        let rest = stem.strip_prefix(self.basename.as_str())?;
        if rest.is_empty() {
            return Some(None);
        }
        let locale = rest.strip_prefix('_')?;
        if locale.is_empty() {
            return None;
        }
        Some(Some(locale.to_string()))
    }
}

impl LocaleBundles for I18nFolder {
    fn bundles(&self, _csn: &Value) -> Result<Vec<LocaleBundle>, InteropError> {
        self.load()
    }
}

fn load_json_bundles(path: &Path) -> Result<Vec<LocaleBundle>, InteropError> {
    let content = std::fs::read_to_string(path).map_err(|source| InteropError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| InteropError::InvalidJson { source })?;

    let locales = match value {
        Value::Object(locales) => locales,
        other => {
            return Err(InteropError::InvalidBundle {
                path: path.to_path_buf(),
                message: format!("expected object, got {}", json_type_name(&other)),
            })
        }
    };

    locales
        .into_iter()
        .map(|(locale, texts)| match texts {
            Value::Object(texts) => Ok(LocaleBundle {
                locale: Some(locale).filter(|l| !l.is_empty()),
                texts,
            }),
            other => Err(InteropError::InvalidBundle {
                path: path.to_path_buf(),
                message: format!(
                    "locale \"{}\": expected object, got {}",
                    locale,
                    json_type_name(&other)
                ),
            }),
        })
        .collect()
}

/// Parse the contents of a `.properties` file into a text map.
///
/// Supports `=` and `:` separators, `#` and `!` comments, trailing-backslash
/// continuation lines and the usual backslash escapes including `\uXXXX`.
pub fn parse_properties(content: &str) -> TextMap {
    let mut texts = TextMap::new();
    let mut logical = String::new();

    for raw in content.lines() {
        let line = raw.trim_start();
        if logical.is_empty()
            && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }
        if ends_with_continuation(line) {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }
        logical.push_str(line);
        insert_entry(&mut texts, &logical);
        logical.clear();
    }
    if !logical.is_empty() {
        insert_entry(&mut texts, &logical);
    }

    texts
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn insert_entry(texts: &mut TextMap, line: &str) {
    let (key, value) = split_entry(line);
    let key = unescape(key.trim());
    if key.is_empty() {
        return;
    }
    texts.insert(key, Value::String(unescape(value.trim())));
}

/// Split at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], &line[i + 1..]),
            _ => {}
        }
    }
    (line, "")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn properties_basic() {
        let texts = parse_properties(
            "# comment\n\
             ! also a comment\n\
             \n\
             Books = Books\n\
             Author:Author\n\
             empty=\n",
        );
        assert_eq!(
            Value::Object(texts),
            json!({ "Books": "Books", "Author": "Author", "empty": "" })
        );
    }

    #[test]
    fn properties_escapes_and_continuation() {
        let texts = parse_properties(
            "greeting=Gr\\u00fc\\u00dfe\\nWelt\n\
             long=first \\\n    second\n\
             a\\=b=c\n",
        );
        assert_eq!(texts["greeting"], json!("Grüße\nWelt"));
        assert_eq!(texts["long"], json!("first second"));
        assert_eq!(texts["a=b"], json!("c"));
    }

    #[test]
    fn properties_crlf() {
        let texts = parse_properties("Title=Titel\r\nName=Name\r\n");
        assert_eq!(texts["Title"], json!("Titel"));
        assert_eq!(texts["Name"], json!("Name"));
    }

    #[test]
    fn properties_file_names() {
        let folder = I18nFolder::new("_i18n");
        assert_eq!(folder.properties_locale("i18n.properties"), Some(None));
        assert_eq!(
            folder.properties_locale("i18n_de.properties"),
            Some(Some("de".to_string()))
        );
        assert_eq!(
            folder.properties_locale("i18n_en_US.properties"),
            Some(Some("en_US".to_string()))
        );
        assert_eq!(folder.properties_locale("i18n_.properties"), None);
        assert_eq!(folder.properties_locale("messages_de.properties"), None);
        assert_eq!(folder.properties_locale("i18n.json"), None);
        assert_eq!(folder.properties_locale("i18nx.properties"), None);
    }

    #[test]
    fn folder_reads_json_then_properties() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("i18n.json"),
            r#"{ "": { "Books": "Books" }, "fr": { "Books": "Livres" } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("i18n.properties"), "Books=Books\n").unwrap();
        fs::write(dir.path().join("i18n_de.properties"), "Books=Bücher\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let bundles = I18nFolder::new(dir.path()).bundles(&json!({})).unwrap();
        let locales: Vec<Option<&str>> = bundles.iter().map(|b| b.locale.as_deref()).collect();
        assert_eq!(locales, vec![None, Some("fr"), None, Some("de")]);
        assert_eq!(bundles[3].texts["Books"], json!("Bücher"));
    }

    #[test]
    fn folder_custom_basename() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages_de.properties"), "a=b\n").unwrap();
        fs::write(dir.path().join("i18n_de.properties"), "c=d\n").unwrap();

        let bundles = I18nFolder::new(dir.path())
            .basename("messages")
            .bundles(&json!({}))
            .unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].texts["a"], json!("b"));
    }

    #[test]
    fn missing_folder_is_empty() {
        let dir = TempDir::new().unwrap();
        let bundles = I18nFolder::new(dir.path().join("nope"))
            .bundles(&json!({}))
            .unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn json_bundle_must_be_object_of_objects() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("i18n.json"), r#"{ "de": "Bücher" }"#).unwrap();

        let err = I18nFolder::new(dir.path())
            .bundles(&json!({}))
            .unwrap_err();
        assert!(matches!(err, InteropError::InvalidBundle { .. }));
        assert!(err.to_string().contains("locale \"de\""));
    }

    #[test]
    fn closure_provider_sees_document() {
        let provider = bundles_from_fn(|csn: &Value| {
            let name = csn["name"].as_str().unwrap_or_default().to_string();
            vec![LocaleBundle::new(name, TextMap::new())]
        });
        let bundles = provider.bundles(&json!({ "name": "de" })).unwrap();
        assert_eq!(bundles[0].locale_code(), Some("de"));
    }
}
