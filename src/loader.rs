//! CSN loading from files, strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::InteropError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a CSN document from a file path.
///
/// # Errors
///
/// Returns `InteropError::FileNotFound` if the file doesn't exist,
/// or `InteropError::InvalidJson` if the file isn't valid JSON.
pub fn load_csn(path: &Path) -> Result<Value, InteropError> {
    if !path.exists() {
        return Err(InteropError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| InteropError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_csn_str(&content)
}

/// Load a CSN document from a JSON string.
///
/// # Errors
///
/// Returns `InteropError::InvalidJson` if the string isn't valid JSON.
pub fn load_csn_str(content: &str) -> Result<Value, InteropError> {
    serde_json::from_str(content).map_err(|source| InteropError::InvalidJson { source })
}

/// Load a CSN document from an HTTP/HTTPS URL, e.g. a running service's
/// CSN endpoint.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `InteropError::NetworkError` if the request fails or the
/// response isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_csn_url(url: &str) -> Result<Value, InteropError> {
    let network_error = |source| InteropError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    tracing::debug!(%url, "fetching CSN");
    client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a CSN document from a file path or URL.
///
/// # Errors
///
/// Same as [`load_csn`] or `load_csn_url`. Without the `remote` feature a URL
/// is reported as a missing file.
pub fn load_csn_auto(source: &str) -> Result<Value, InteropError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_csn_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(InteropError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_csn(Path::new(source))
    }
}
