//! Resolution of public post URLs into route components.
//!
//! Published posts live at `/post/{yyyy}/{M}/{d}/{slug}`; a pingback target
//! must match that shape before it is looked up in the database.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::entities::PostRoute;
use crate::utils::url_normalizer::parse_http_url;

/// Errors that can occur while resolving a target URL into a post route.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteParseError {
    #[error("target is not an absolute HTTP(S) URL")]
    InvalidUrl,

    #[error("target host `{actual}` does not belong to this site (`{expected}`)")]
    ForeignHost { expected: String, actual: String },

    #[error("path is not a post route")]
    NotAPostRoute,

    #[error("post route carries an impossible date")]
    InvalidDate,
}

/// Parses a target URL into a [`PostRoute`].
///
/// When `site_host` is provided the URL host must match it (case-insensitive).
/// A trailing slash, query string and fragment are ignored. The slug is
/// lower-cased, matching how slugs are stored.
pub fn parse_post_route(target_url: &str, site_host: Option<&str>) -> Result<PostRoute, RouteParseError> {
    let url = parse_http_url(target_url).map_err(|_| RouteParseError::InvalidUrl)?;

    if let Some(expected) = site_host {
        let actual = url.host_str().unwrap_or_default();
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(RouteParseError::ForeignHost {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let [prefix, year, month, day, slug] = segments.as_slice() else {
        return Err(RouteParseError::NotAPostRoute);
    };

    if !prefix.eq_ignore_ascii_case("post") {
        return Err(RouteParseError::NotAPostRoute);
    }

    let (Ok(year), Ok(month), Ok(day)) = (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>())
    else {
        return Err(RouteParseError::NotAPostRoute);
    };

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(RouteParseError::InvalidDate)?;

    Ok(PostRoute {
        date,
        slug: slug.to_lowercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_route() {
        let route = parse_post_route("https://blog.example.com/post/2024/5/12/Hello-World", None).unwrap();
        assert_eq!(route.date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(route.slug, "hello-world");
    }

    #[test]
    fn test_parse_zero_padded_and_trailing_slash() {
        let route = parse_post_route("https://blog.example.com/post/2024/05/02/hello/?utm=x#c", None).unwrap();
        assert_eq!(route.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(route.slug, "hello");
    }

    #[test]
    fn test_parse_site_host_must_match() {
        assert!(parse_post_route("https://BLOG.example.com/post/2024/5/12/a", Some("blog.example.com")).is_ok());

        let err = parse_post_route("https://evil.example/post/2024/5/12/a", Some("blog.example.com")).unwrap_err();
        assert!(matches!(err, RouteParseError::ForeignHost { .. }));
    }

    #[test]
    fn test_parse_rejects_non_post_paths() {
        for url in [
            "https://blog.example.com/",
            "https://blog.example.com/page/about",
            "https://blog.example.com/post/2024/5/hello",
            "https://blog.example.com/tags/2024/5/12/rust",
            "https://blog.example.com/post/twenty/5/12/rust",
            "https://blog.example.com/post/2024/5/12/rust/extra",
        ] {
            assert_eq!(
                parse_post_route(url, None),
                Err(RouteParseError::NotAPostRoute),
                "{url}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(
            parse_post_route("https://blog.example.com/post/2023/2/30/x", None),
            Err(RouteParseError::InvalidDate)
        );
    }

    #[test]
    fn test_parse_rejects_invalid_urls() {
        assert_eq!(parse_post_route("post/2024/5/12/x", None), Err(RouteParseError::InvalidUrl));
        assert_eq!(parse_post_route("ftp://blog.example.com/post/2024/5/12/x", None), Err(RouteParseError::InvalidUrl));
    }
}
