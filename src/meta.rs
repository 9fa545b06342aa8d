//! Metadata deriver - stamps the interop version and the `meta` block.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::error::InteropError;
use crate::traverse::{definitions, has_kind};
use crate::types::{DEFAULT_VERSION_MAJOR, FLAVOR, INTEROP_VERSION};

fn version_segment_regex() -> &'static Regex {
    static VERSION_SEGMENT: OnceLock<Regex> = OnceLock::new();
    VERSION_SEGMENT.get_or_init(|| Regex::new(r"^v(\d+)$").expect("valid version segment regex"))
}

/// A service's qualified name split into namespace, short name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName {
    /// Short service name. `None` only when the name is a bare version
    /// segment such as `v2`.
    pub name: Option<String>,
    /// Remaining leading segments joined with `.`.
    pub namespace: Option<String>,
    /// Digits of a trailing `vN` segment, `1` otherwise.
    pub version_major: String,
}

impl ServiceName {
    /// Semantic version string, e.g. `2.0.0`.
    pub fn version(&self) -> String {
        format!("{}.0.0", self.version_major)
    }
}

/// Split a qualified service name.
///
/// A trailing segment of the form `v<digits>` is a version marker; the
/// segment before it is then the short name.
///
/// ```
/// use csn_interop::parse_service_name;
///
/// let parsed = parse_service_name("customer.namespace.MyService.v2");
/// assert_eq!(parsed.name.as_deref(), Some("MyService"));
/// assert_eq!(parsed.namespace.as_deref(), Some("customer.namespace"));
/// assert_eq!(parsed.version(), "2.0.0");
/// ```
pub fn parse_service_name(qualified: &str) -> ServiceName {
    let mut segments: Vec<&str> = qualified.split('.').collect();
    let mut name = segments.pop();
    let mut version_major = DEFAULT_VERSION_MAJOR.to_string();

    if let Some(caps) = name.and_then(|n| version_segment_regex().captures(n)) {
        version_major = caps[1].to_string();
        name = segments.pop();
    }

    ServiceName {
        name: name.map(String::from),
        namespace: (!segments.is_empty()).then(|| segments.join(".")),
        version_major,
    }
}

/// Stamp `csnInteropEffective` and `meta.flavor`, and derive `meta.document`,
/// `meta.__name` and `meta.__namespace` when exactly one service is defined.
///
/// Existing `meta` entries are kept. A non-object document is left untouched.
///
/// # Errors
///
/// Returns `InteropError` if an object document has no `definitions` object.
pub fn derive_meta(csn: &mut Value) -> Result<(), InteropError> {
    if !csn.is_object() {
        return Ok(());
    }

    let services: Vec<String> = definitions(csn)?
        .iter()
        .filter(|(_, def)| def.as_object().is_some_and(|def| has_kind(def, "service")))
        .map(|(name, _)| name.clone())
        .collect();

    let Value::Object(doc) = csn else {
        return Ok(());
    };

    doc.insert("csnInteropEffective".to_string(), json!(INTEROP_VERSION));
    if !doc.get("meta").is_some_and(Value::is_object) {
        doc.insert("meta".to_string(), Value::Object(Map::new()));
    }
    let Some(Value::Object(meta)) = doc.get_mut("meta") else {
        return Ok(());
    };
    meta.insert("flavor".to_string(), json!(FLAVOR));

    let [service] = services.as_slice() else {
        tracing::debug!(services = services.len(), "skipping service metadata");
        return Ok(());
    };

    let parsed = parse_service_name(service);
    tracing::debug!(
        service = %service,
        name = ?parsed.name,
        namespace = ?parsed.namespace,
        version = %parsed.version(),
        "derived service metadata"
    );

    meta.insert(
        "document".to_string(),
        json!({ "version": parsed.version() }),
    );
    if let Some(name) = parsed.name {
        meta.insert("__name".to_string(), Value::String(name));
    }
    if let Some(namespace) = parsed.namespace {
        meta.insert("__namespace".to_string(), Value::String(namespace));
    }

    Ok(())
}
