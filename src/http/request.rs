//! Request description and wire-format serialization.

use crate::error::Error;
use crate::http::url::UrlParts;
use crate::http::{MAX_HEADERS, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, REQUEST_BUF_SIZE};
use core::fmt::Write;
use heapless::{String, Vec};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A single HTTP header as a name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name. Response headers are stored lower-cased.
    pub name: String<MAX_HEADER_NAME_LEN>,
    /// Header value, trimmed of leading spaces on the response side.
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

/// An immutable description of one HTTP call.
///
/// Caller-supplied headers are sent verbatim after the built-in ones; they
/// are not deduplicated against `Host`, `Accept`, `Content-Type`, or
/// `Content-Length`.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Absolute URL, `http://` or `https://`, with an explicit path.
    pub url: &'a str,
    /// Extra headers to send after the built-in ones.
    pub headers: Vec<Header, MAX_HEADERS>,
    /// Optional request body.
    pub body: Option<&'a [u8]>,
    /// Value for the `Content-Type` header, used only when a non-empty
    /// body is present.
    pub content_type: &'a str,
    /// Maximum number of redirects to follow. Negative means unlimited;
    /// `0` returns the first redirect response unfollowed.
    pub max_redirects: i32,
}

fn put(wire: &mut Vec<u8, REQUEST_BUF_SIZE>, bytes: &[u8]) -> Result<(), Error> {
    wire.extend_from_slice(bytes)
        .map_err(|_| Error::RequestTooLarge)
}

/// Render the wire-format request for one leg.
///
/// Emits the request line, `Host` (with explicit port), `Accept: */*`,
/// `Content-Type`/`Content-Length` when a non-empty body is present, the
/// caller's headers, a blank line, and the body bytes, in that order.
pub(crate) fn serialize(
    request: &Request<'_>,
    target: &UrlParts<'_>,
) -> Result<Vec<u8, REQUEST_BUF_SIZE>, Error> {
    let mut wire: Vec<u8, REQUEST_BUF_SIZE> = Vec::new();

    // Request line
    put(&mut wire, request.method.as_str().as_bytes())?;
    put(&mut wire, b" ")?;
    put(&mut wire, target.path.as_bytes())?;
    put(&mut wire, b" HTTP/1.1\r\n")?;

    // Host with an explicit port, then Accept
    let mut port: String<5> = String::new();
    write!(port, "{}", target.port).unwrap();
    put(&mut wire, b"Host: ")?;
    put(&mut wire, target.host.as_bytes())?;
    put(&mut wire, b":")?;
    put(&mut wire, port.as_bytes())?;
    put(&mut wire, b"\r\nAccept: */*\r\n")?;

    // Body framing headers, only when there is something to frame
    let body = request.body.filter(|body| !body.is_empty());
    if let Some(body) = body {
        let mut length: String<20> = String::new();
        write!(length, "{}", body.len()).unwrap();
        put(&mut wire, b"Content-Type: ")?;
        put(&mut wire, request.content_type.as_bytes())?;
        put(&mut wire, b"\r\nContent-Length: ")?;
        put(&mut wire, length.as_bytes())?;
        put(&mut wire, b"\r\n")?;
    }

    // Caller headers, verbatim
    for header in &request.headers {
        put(&mut wire, header.name.as_bytes())?;
        put(&mut wire, b": ")?;
        put(&mut wire, header.value.as_bytes())?;
        put(&mut wire, b"\r\n")?;
    }

    put(&mut wire, b"\r\n")?;
    if let Some(body) = body {
        put(&mut wire, body)?;
    }

    Ok(wire)
}
