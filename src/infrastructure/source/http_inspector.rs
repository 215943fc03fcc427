//! Fetches pingback sources with `reqwest` and scans them with `lol_html`.

use std::cell::RefCell;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use regex::Regex;
use reqwest::{Client, header};
use tracing::debug;
use url::{Host, Url};

use crate::domain::entities::PingRequest;
use crate::domain::source_inspector::{SourceInspectError, SourceInspector};
use crate::utils::url_normalizer::same_resource;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(!doctype\s+html|html|head|body|a|p|div|title)[\s>/]")
        .expect("valid markup regex")
});

const MAX_REDIRECTS: usize = 5;

/// Result of scanning a source document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub title: String,
    pub has_link: bool,
    /// The document contains recognizable HTML elements.
    pub is_markup: bool,
}

#[derive(Default)]
struct ScanState {
    title: String,
    has_link: bool,
}

/// Looks for an anchor pointing at `target_url` and collects the `<title>`
/// text.
///
/// Relative `href`s are resolved against `source_url`.
pub fn scan_document(
    html: &str,
    source_url: &str,
    target_url: &str,
) -> Result<ScanResult, SourceInspectError> {
    let base = Url::parse(source_url).ok();
    let state = Rc::new(RefCell::new(ScanState::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("a[href]", {
                    let state = Rc::clone(&state);
                    move |el| {
                        if state.borrow().has_link {
                            return Ok(());
                        }
                        if let Some(href) = el.get_attribute("href") {
                            let resolved = match &base {
                                Some(base) => base
                                    .join(href.trim())
                                    .map(|u| u.to_string())
                                    .unwrap_or(href),
                                None => href,
                            };
                            if same_resource(&resolved, target_url) {
                                state.borrow_mut().has_link = true;
                            }
                        }
                        Ok(())
                    }
                }),
                text!("title", {
                    let state = Rc::clone(&state);
                    move |chunk| {
                        state.borrow_mut().title.push_str(chunk.as_str());
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| SourceInspectError::Unparseable(e.to_string()))?;

    let state = state.borrow();
    Ok(ScanResult {
        title: state.title.trim().to_string(),
        has_link: state.has_link,
        is_markup: MARKUP.is_match(html),
    })
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Returns `true` for addresses reachable on the public internet.
///
/// Loopback, private, shared (CGNAT), link-local, unique-local, documentation,
/// multicast and unspecified ranges are not public. IPv4-mapped IPv6 addresses
/// are judged by their IPv4 part.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_multicast()
                || a == 0
                || (a == 100 && (b & 0xc0) == 64))
        }
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_ip(IpAddr::V4(v4)),
            None => {
                !(v6.is_loopback()
                    || v6.is_unspecified()
                    || v6.is_multicast()
                    || v6.is_unique_local()
                    || v6.is_unicast_link_local())
            }
        },
    }
}

/// Refuses URLs whose host is, or resolves to, a non-public address.
async fn ensure_public_host(url: &Url) -> Result<(), SourceInspectError> {
    let addresses: Vec<IpAddr> = match url.host() {
        Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
        Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
        Some(Host::Domain(domain)) => {
            let port = url.port_or_known_default().unwrap_or(80);
            tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| SourceInspectError::Unreachable(e.to_string()))?
                .map(|addr| addr.ip())
                .collect()
        }
        None => return Err(SourceInspectError::Unreachable("URL has no host".to_string())),
    };

    match addresses.into_iter().find(|ip| !is_public_ip(*ip)) {
        Some(ip) => Err(SourceInspectError::ForbiddenAddress(ip.to_string())),
        None => Ok(()),
    }
}

/// HTTP implementation of [`SourceInspector`].
///
/// Redirects are followed by hand so every hop passes the public-address
/// check.
pub struct HttpSourceInspector {
    client: Client,
    max_bytes: usize,
    allow_private: bool,
}

impl HttpSourceInspector {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, max_bytes: usize) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_bytes,
            allow_private: false,
        })
    }

    /// Allows sources on loopback and private networks.
    pub fn allow_private_addresses(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    async fn fetch(&self, source_url: &str) -> Result<String, SourceInspectError> {
        let mut url = Url::parse(source_url)
            .map_err(|e| SourceInspectError::Unreachable(e.to_string()))?;
        let mut redirects = 0;

        let mut response = loop {
            if !self.allow_private {
                ensure_public_host(&url).await?;
            }

            let response = self
                .client
                .get(url.clone())
                .header(header::ACCEPT, "text/html, application/xhtml+xml")
                .send()
                .await
                .map_err(map_reqwest_error)?;

            if !response.status().is_redirection() {
                break response;
            }

            let next = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|location| url.join(location).ok())
                .filter(|next| matches!(next.scheme(), "http" | "https"));
            match next {
                Some(next) if redirects < MAX_REDIRECTS => {
                    debug!(from = %url, to = %next, "Following source redirect");
                    redirects += 1;
                    url = next;
                }
                _ => return Err(SourceInspectError::Status(response.status().as_u16())),
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SourceInspectError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_html(&content_type) {
            return Err(SourceInspectError::NotHtml(content_type));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(SourceInspectError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> SourceInspectError {
    if e.is_timeout() {
        SourceInspectError::Timeout
    } else {
        SourceInspectError::Unreachable(e.to_string())
    }
}

#[async_trait]
impl SourceInspector for HttpSourceInspector {
    async fn inspect(
        &self,
        source_url: &str,
        target_url: &str,
    ) -> Result<PingRequest, SourceInspectError> {
        let html = self.fetch(source_url).await?;
        let scan = scan_document(&html, source_url, target_url)?;

        debug!(
            source_url,
            has_link = scan.has_link,
            bytes = html.len(),
            "Scanned pingback source"
        );

        Ok(PingRequest {
            source_url: source_url.to_string(),
            target_url: target_url.to_string(),
            contains_html: scan.is_markup,
            source_document_title: scan.title,
            source_has_link: scan.has_link,
        })
    }
}
