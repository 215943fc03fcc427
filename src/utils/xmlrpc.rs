//! Minimal XML-RPC codec for the `pingback.ping` method.
//!
//! Only what the pingback endpoint needs is supported: reading a method call
//! with positional string parameters, and writing a single-string success
//! response or a fault response.

use roxmltree::{Document, Node};
use thiserror::Error;

/// The only method accepted by the pingback endpoint.
pub const PINGBACK_METHOD: &str = "pingback.ping";

/// Errors produced while decoding a pingback method call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XmlRpcError {
    #[error("request body is empty")]
    EmptyBody,

    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("root element is not <methodCall>")]
    NotMethodCall,

    #[error("unexpected method `{0}`")]
    UnexpectedMethod(String),

    #[error("missing string parameter at position {0}")]
    MissingParameter(usize),
}

/// Decoded `pingback.ping(sourceURI, targetURI)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingbackCall {
    pub source_url: String,
    pub target_url: String,
}

/// Parses an XML-RPC `pingback.ping` method call.
///
/// Parameters are read positionally; a value with no type element is treated
/// as a string, per XML-RPC. Parameter values are trimmed.
///
/// # Errors
///
/// - [`XmlRpcError::EmptyBody`] for empty or whitespace-only input
/// - [`XmlRpcError::Malformed`] when the XML cannot be parsed (DTDs are refused)
/// - [`XmlRpcError::NotMethodCall`] / [`XmlRpcError::UnexpectedMethod`] for
///   anything other than a `pingback.ping` call
/// - [`XmlRpcError::MissingParameter`] when either URL is absent or blank
pub fn parse_pingback_call(body: &str) -> Result<PingbackCall, XmlRpcError> {
    if body.trim().is_empty() {
        return Err(XmlRpcError::EmptyBody);
    }

    let doc = Document::parse(body.trim()).map_err(|e| XmlRpcError::Malformed(e.to_string()))?;
    let root = doc.root_element();

    if !root.has_tag_name("methodCall") {
        return Err(XmlRpcError::NotMethodCall);
    }

    let method = child_element(root, "methodName")
        .and_then(|n| n.text())
        .map(str::trim)
        .unwrap_or_default();

    if method != PINGBACK_METHOD {
        return Err(XmlRpcError::UnexpectedMethod(method.to_string()));
    }

    let params: Vec<Option<String>> = child_element(root, "params")
        .map(|params| {
            params
                .children()
                .filter(|n| n.has_tag_name("param"))
                .map(|param| child_element(param, "value").and_then(string_value))
                .collect()
        })
        .unwrap_or_default();

    let source_url = positional(&params, 0)?;
    let target_url = positional(&params, 1)?;

    Ok(PingbackCall {
        source_url,
        target_url,
    })
}

/// Builds a method response carrying a single string value.
pub fn success_response(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value><string>{}</string></value></param></params></methodResponse>",
        escape(message)
    )
}

/// Builds a fault response with the given code and message.
pub fn fault_response(code: i32, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\
         <member><name>faultString</name><value><string>{}</string></value></member>\
         </struct></value></fault></methodResponse>",
        escape(message)
    )
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Extracts the string content of a `<value>` node.
///
/// Typed values other than `<string>` are not strings and yield `None`.
fn string_value(value: Node) -> Option<String> {
    match value.children().find(|n| n.is_element()) {
        Some(typed) if typed.has_tag_name("string") => Some(typed.text().unwrap_or_default()),
        Some(_) => None,
        None => Some(value.text().unwrap_or_default()),
    }
    .map(|s| s.trim().to_string())
}

fn positional(params: &[Option<String>], index: usize) -> Result<String, XmlRpcError> {
    match params.get(index) {
        Some(Some(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(XmlRpcError::MissingParameter(index)),
    }
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
