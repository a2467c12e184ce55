//! Wire decoder for hook requests.
//!
//! The configurator posts a `multipart/form-data` body carrying two fields:
//! `type`, a UTF-8 tag naming the message kind, and `value`, the opaque
//! protobuf-encoded payload. The decoder tokenizes the body on the boundary
//! declared in `Content-Type`, parses each part's own header block, and
//! looks the fields up by name. Part order is free and unknown parts are
//! ignored. Malformed input fails explicitly instead of mis-slicing.
//!
//! The whole body is expected in one buffer; this is not a streaming parser.

use axum::http::{header, HeaderMap};
use bytes::Bytes;
use thiserror::Error;

/// A decoded hook request: the message kind tag and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookMessage {
    pub kind: String,
    pub payload: Bytes,
}

/// Why a request body could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// `Content-Length` absent or non-numeric.
    #[error("missing or invalid Content-Length header")]
    ContentLength,

    /// `Content-Length` disagrees with the bytes actually received.
    #[error("Content-Length {declared} does not match body length {actual}")]
    ContentLengthMismatch { declared: usize, actual: usize },

    /// No usable `boundary=` parameter in `Content-Type`.
    #[error("missing multipart boundary in Content-Type header")]
    Boundary,

    /// The body does not follow the multipart framing rules.
    #[error("malformed multipart body: {0}")]
    Malformed(&'static str),

    /// A required named part is absent.
    #[error("required field `{0}` not present in request body")]
    MissingField(&'static str),

    /// The `type` field is not valid UTF-8.
    #[error("field `type` is not valid UTF-8")]
    FieldEncoding,
}

/// Decode a fully buffered request into a [`HookMessage`].
pub fn decode(headers: &HeaderMap, body: &[u8]) -> Result<HookMessage, DecodeError> {
    let declared = content_length(headers)?;
    if declared != body.len() {
        return Err(DecodeError::ContentLengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    let boundary = boundary(headers)?;
    let parts = split_parts(body, &boundary)?;

    let kind = parts
        .iter()
        .find(|p| p.name == "type")
        .ok_or(DecodeError::MissingField("type"))?;
    let kind = std::str::from_utf8(&kind.content)
        .map_err(|_| DecodeError::FieldEncoding)?
        .to_string();

    let payload = parts
        .iter()
        .find(|p| p.name == "value")
        .ok_or(DecodeError::MissingField("value"))?;

    Ok(HookMessage {
        kind,
        payload: Bytes::copy_from_slice(&payload.content),
    })
}

fn content_length(headers: &HeaderMap) -> Result<usize, DecodeError> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .ok_or(DecodeError::ContentLength)
}

/// Extract the boundary token from `Content-Type`, tolerating quoting and
/// trailing parameters.
fn boundary(headers: &HeaderMap) -> Result<String, DecodeError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or(DecodeError::Boundary)?;

    let marker = "boundary=";
    let start = content_type.find(marker).ok_or(DecodeError::Boundary)? + marker.len();
    let token = content_type[start..]
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches('"');

    if token.is_empty() {
        return Err(DecodeError::Boundary);
    }
    Ok(token.to_string())
}

struct Part {
    name: String,
    content: Vec<u8>,
}

/// Split the body on `--boundary` delimiter lines and parse each part.
fn split_parts(body: &[u8], boundary: &str) -> Result<Vec<Part>, DecodeError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut parts = Vec::new();
    let mut pos = find(body, delimiter, 0).ok_or(DecodeError::Malformed("no boundary found"))?;

    loop {
        pos += delimiter.len();
        if body[pos..].starts_with(b"--") {
            // Closing delimiter; anything after it is epilogue.
            break;
        }
        if !body[pos..].starts_with(b"\r\n") {
            return Err(DecodeError::Malformed("boundary not followed by CRLF"));
        }
        pos += 2;

        let end = find(body, delimiter, pos).ok_or(DecodeError::Malformed("unterminated part"))?;
        let raw = body[pos..end]
            .strip_suffix(b"\r\n")
            .ok_or(DecodeError::Malformed("part not terminated by CRLF"))?;
        parts.push(parse_part(raw)?);
        pos = end;
    }

    Ok(parts)
}

/// Parse one part: a header block terminated by a blank line, then content.
fn parse_part(raw: &[u8]) -> Result<Part, DecodeError> {
    let header_end =
        find(raw, b"\r\n\r\n", 0).ok_or(DecodeError::Malformed("part has no header block"))?;
    let headers = &raw[..header_end];
    let content = raw[header_end + 4..].to_vec();

    let headers =
        std::str::from_utf8(headers).map_err(|_| DecodeError::Malformed("part headers not UTF-8"))?;
    let name = headers
        .split("\r\n")
        .find(|line| {
            line.get(.."content-disposition:".len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("content-disposition:"))
        })
        .and_then(disposition_name)
        .ok_or(DecodeError::Malformed("part has no form-data name"))?;

    Ok(Part {
        name: name.to_string(),
        content,
    })
}

/// Pull the `name="..."` parameter out of a Content-Disposition line.
fn disposition_name(line: &str) -> Option<&str> {
    let start = line.find("name=\"")? + "name=\"".len();
    let end = line[start..].find('"')? + start;
    Some(&line[start..end])
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|p| p + from)
}
