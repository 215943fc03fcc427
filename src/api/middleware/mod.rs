//! Request middleware: bearer auth for `/api`, per-IP rate limits, request spans.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
