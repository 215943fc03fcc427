//! URL normalization for pingback source/target comparison.
//!
//! Pingback sources rarely quote the target URL byte-for-byte: hosts differ in
//! case, default ports appear, fragments are appended. Both sides are
//! normalized before they are compared or stored.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes an absolute HTTP(S) URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Hostname**: Lower-cased by the parser
/// 3. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: Removed
/// 5. **Path and query**: Preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed or relative URLs,
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`UrlNormalizationError::MissingHost`] when no host is present.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let url = parse_http_url(input)?;
    Ok(url.to_string())
}

/// Parses and normalizes an absolute HTTP(S) URL, returning the [`Url`].
pub fn parse_http_url(input: &str) -> Result<Url, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    if url.host_str().is_none() {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    // `Url` already drops a port equal to the scheme default; this covers
    // explicit ports set through other constructors.
    if matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = url.set_port(None);
    }

    Ok(url)
}

/// Returns `true` when both strings name the same resource.
///
/// Comparison is done on normalized URLs and ignores a single trailing slash
/// on the path. Unparseable inputs never match.
pub fn same_resource(a: &str, b: &str) -> bool {
    match (normalize_url(a), normalize_url(b)) {
        (Ok(a), Ok(b)) => a.trim_end_matches('/') == b.trim_end_matches('/'),
        _ => false,
    }
}

/// Extracts the host of an HTTP(S) URL, lower-cased.
pub fn host_of(input: &str) -> Option<String> {
    parse_http_url(input)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
