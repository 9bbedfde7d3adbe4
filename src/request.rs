use itertools::Itertools;
use thiserror::Error;

use crate::headers::HeaderMap;

pub const PROTOCOL_VERSION: &str = "HTTP/1.1";

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Reasons a request head cannot be processed. Both map to
/// `422 Unprocessable Entity`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("only HTTP/1.1 is supported, got {0:?}")]
    UnsupportedVersion(String),

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
}

#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub target: String,

    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    /// Parses a buffer holding exactly one HTTP message.
    ///
    /// A buffer without a blank line is treated as a bare head with an empty
    /// body. Everything after the first blank line is the body, byte for byte.
    pub fn parse(buf: &[u8]) -> Result<Request, ParseError> {
        let (head, body) = match find_subsequence(buf, HEAD_TERMINATOR) {
            Some(idx) => (&buf[..idx], &buf[idx + HEAD_TERMINATOR.len()..]),
            None => (buf, &[][..]),
        };

        let head = String::from_utf8_lossy(head);
        let (request_line, header_block) = head.split_once("\r\n").unwrap_or((&*head, ""));

        let (method, target, version) = request_line
            .split(' ')
            .collect_tuple()
            .ok_or_else(|| ParseError::MalformedRequestLine(request_line.to_string()))?;

        if method.is_empty() || target.is_empty() {
            return Err(ParseError::MalformedRequestLine(request_line.to_string()));
        }

        if version != PROTOCOL_VERSION {
            return Err(ParseError::UnsupportedVersion(version.to_string()));
        }

        Ok(Request {
            method: method.to_string(),
            target: target.to_string(),
            headers: parse_headers(header_block),
            body: body.to_vec(),
        })
    }

    /// Whether the client listed `gzip` among its accepted content codings.
    #[must_use]
    pub fn accepts_gzip(&self) -> bool {
        self.headers
            .get("accept-encoding")
            .is_some_and(|v| get_encodings(v).any(|coding| coding.eq_ignore_ascii_case("gzip")))
    }
}

fn parse_headers(block: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    // Lines without a colon are skipped rather than rejected.
    for (name, value) in block
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| !name.trim().is_empty())
    {
        headers.set(name, value);
    }

    headers
}

fn get_encodings(v: &str) -> impl Iterator<Item = &str> {
    v.split(',')
        .filter_map(|entry| entry.split(';').next())
        .map(str::trim)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
