//! Port for fetching and inspecting pingback source documents.

use crate::domain::entities::PingRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a usable source document.
#[derive(Debug, Error)]
pub enum SourceInspectError {
    /// The source answered with something other than an HTML page.
    #[error("source is not an HTML document (content type: {0})")]
    NotHtml(String),

    #[error("source answered with HTTP {0}")]
    Status(u16),

    #[error("source request timed out")]
    Timeout,

    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("source document exceeds {0} bytes")]
    TooLarge(usize),

    #[error("source document could not be parsed: {0}")]
    Unparseable(String),

    /// The source host is, or resolves to, a loopback or private address.
    #[error("source resolves to non-public address {0}")]
    ForbiddenAddress(String),
}

impl SourceInspectError {
    /// Content-type failures are treated as spam rather than a transient fault.
    pub fn is_spam_signal(&self) -> bool {
        matches!(self, Self::NotHtml(_))
    }
}

/// Fetches a source document and reports what it contains.
///
/// # Implementations
///
/// - [`crate::infrastructure::source::HttpSourceInspector`] - `reqwest` + `lol_html`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceInspector: Send + Sync {
    /// Fetches `source_url` and looks for a link to `target_url`.
    ///
    /// # Errors
    ///
    /// See [`SourceInspectError`].
    async fn inspect(
        &self,
        source_url: &str,
        target_url: &str,
    ) -> Result<PingRequest, SourceInspectError>;
}
