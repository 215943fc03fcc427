//! Client IP extraction for pingback bookkeeping.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Determines the originating client IP of a request.
///
/// When `behind_proxy` is set, the first entry of `X-Forwarded-For` is used,
/// then `X-Real-IP`; unparseable header values are ignored. Otherwise, and as
/// a fallback, the socket peer address is returned when known.
///
/// Only enable `behind_proxy` when a trusted reverse proxy overwrites these
/// headers; they are client-controlled otherwise.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, Some("10.0.0.1:4000".parse().unwrap()), true);
/// assert_eq!(ip.unwrap().to_string(), "203.0.113.7");
/// ```
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<IpAddr> {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        if forwarded.is_some() {
            return forwarded;
        }

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        if real_ip.is_some() {
            return real_ip;
        }
    }

    peer.map(|p| p.ip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.1:4000".parse().unwrap())
    }

    fn ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
        client_ip(headers, peer, behind_proxy).unwrap().to_string()
    }

    #[test]
    fn test_client_ip_uses_peer_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(ip(&headers, peer(), false), "10.0.0.1");
    }

    #[test]
    fn test_client_ip_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 198.51.100.2"),
        );

        assert_eq!(ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));

        assert_eq!(ip(&headers, peer(), true), "2001:db8::1");
    }

    #[test]
    fn test_client_ip_ignores_garbage_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        headers.insert("x-real-ip", HeaderValue::from_static("not-an-ip"));

        assert_eq!(ip(&headers, peer(), true), "10.0.0.1");
    }

    #[test]
    fn test_client_ip_unknown_peer() {
        assert!(client_ip(&HeaderMap::new(), None, false).is_none());
        assert!(client_ip(&HeaderMap::new(), None, true).is_none());
    }
}
