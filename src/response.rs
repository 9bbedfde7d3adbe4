use std::io::Write;

use flate2::{write::GzEncoder, Compression};

use crate::{headers::HeaderMap, request::PROTOCOL_VERSION};

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Headers computed by the serializer; never copied from auxiliary headers.
const RESERVED_HEADERS: [&str; 3] = ["content-length", "content-type", "content-encoding"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Response {
        Response {
            status,
            content_type: None,
            headers: HeaderMap::new(),
            body: vec![],
        }
    }

    /// A `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Response {
        Response::new(status)
            .with_content_type(TEXT_PLAIN)
            .with_body(body.into().into_bytes())
    }

    pub fn with_content_type(mut self, content_type: &str) -> Response {
        self.content_type = Some(content_type.to_string());

        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Response {
        self.headers.set(name, value);

        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Response {
        self.body = body;

        self
    }

    /// Renders the response to wire bytes, gzip-compressing the body first
    /// when `gzip` is set so that `content-length` counts encoded bytes.
    /// Empty bodies are always sent as-is.
    pub fn render(&self, gzip: bool) -> Vec<u8> {
        let compressed = if gzip && !self.body.is_empty() {
            gzip_body(&self.body)
        } else {
            None
        };
        let body = compressed.as_deref().unwrap_or(&self.body);

        let mut head = format!(
            "{PROTOCOL_VERSION} {} {}\r\n",
            self.status,
            reason_phrase(self.status)
        );

        for (name, value) in self.headers.iter() {
            if RESERVED_HEADERS.contains(&name) {
                continue;
            }
            head += &format!("{name}: {value}\r\n");
        }

        head += &format!("content-length: {}\r\n", body.len());

        if let Some(content_type) = self.content_type.as_deref().filter(|t| !t.is_empty()) {
            head += &format!("content-type: {content_type}\r\n");
        }

        if compressed.is_some() {
            head += "content-encoding: gzip\r\n";
        }

        head += "\r\n";

        let mut wire = head.into_bytes();
        wire.extend_from_slice(body);

        wire
    }
}

/// Reason phrase for `status`, empty for codes outside the table.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        411 => "Length Required",
        413 => "Content Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        505 => "HTTP Version Not Supported",
        _ => "",
    }
}

fn gzip_body(body: &[u8]) -> Option<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());

    match encoder.write_all(body).and_then(|()| encoder.finish()) {
        Ok(compressed) => Some(compressed),
        Err(e) => {
            tracing::warn!(error = %e, "gzip compression failed, sending identity body");
            None
        }
    }
}
