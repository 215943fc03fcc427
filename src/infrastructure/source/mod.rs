//! Pingback source inspection over HTTP.

mod http_inspector;

pub use http_inspector::{HttpSourceInspector, scan_document};
