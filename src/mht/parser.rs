//! Archive reader.
//!
//! MIME structure, transfer decoding and charset conversion are delegated to
//! [`mailparse`]; this module only maps its message tree onto a [`Container`].
//!
//! mailparse hands back a subpart's body together with the line break that
//! precedes the next boundary. That break belongs to the delimiter, so it is
//! dropped from every subpart whose transfer encoding keeps line breaks
//! (everything but base64, where they are ignored while decoding).

use mailparse::body::Body;
use mailparse::{MailHeaderMap, ParsedMail, parse_mail};
use tracing::debug;

use crate::error::Result;

use super::resolver;
use super::structures::{Container, Part, PartBody};

const CONTENT_LOCATION: &str = "Content-Location";

/// Parse a complete archive into a [`Container`].
///
/// A multipart envelope yields its direct subparts in order. Any other
/// message is a container holding that one part. Nested multiparts are not
/// descended into.
pub fn parse_archive(data: &[u8]) -> Result<Container> {
    let mail = parse_mail(data)?;

    let mut container = Container::new();
    if mail.ctype.mimetype.starts_with("multipart/") {
        for sub in &mail.subparts {
            container.push(convert_part(sub, true)?);
        }
    } else {
        container.push(convert_part(&mail, false)?);
    }

    debug!("parsed {} parts", container.len());
    Ok(container)
}

/// Map one MIME part. `delimited` is set for subparts of a multipart, whose
/// bodies end right before a boundary delimiter.
fn convert_part(mail: &ParsedMail<'_>, delimited: bool) -> Result<Part> {
    let content_type = mail.ctype.mimetype.to_ascii_lowercase();
    let location = mail
        .headers
        .get_first_value(CONTENT_LOCATION)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let encoded = mail.get_body_encoded();
    let trim_decoded = delimited && !matches!(encoded, Body::Base64(_));

    let (body, raw_payload) = if resolver::is_text_type(&content_type) {
        let charset = mail.ctype.charset.to_ascii_lowercase();
        let mut content = decode_text(mail, &charset)?;
        if trim_decoded {
            trim_delimiter_break(&mut content);
        }
        let mut raw = encoded_payload(&encoded);
        if delimited {
            trim_delimiter_break_bytes(&mut raw);
        }
        let body = PartBody::Text {
            charset: Some(charset),
            content,
        };
        (body, Some(raw))
    } else {
        let mut data = mail.get_body_raw()?;
        if trim_decoded {
            trim_delimiter_break_bytes(&mut data);
        }
        (PartBody::Binary(data), None)
    };

    Ok(Part {
        content_type,
        location,
        body,
        raw_payload,
    })
}

/// Decode a text body.
///
/// UTF-8 compatible charsets are decoded directly so the text survives byte
/// for byte, byte-order mark included. Anything else, or bytes that are not
/// valid UTF-8 after all, goes through mailparse's charset conversion.
fn decode_text(mail: &ParsedMail<'_>, charset: &str) -> Result<String> {
    if matches!(charset, "utf-8" | "utf8" | "us-ascii" | "ascii") {
        if let Ok(text) = String::from_utf8(mail.get_body_raw()?) {
            return Ok(text);
        }
    }
    Ok(mail.get_body()?)
}

/// Body bytes as they appear in the archive, transfer encoding left intact.
fn encoded_payload(body: &Body<'_>) -> Vec<u8> {
    match body {
        Body::Base64(b) | Body::QuotedPrintable(b) => b.get_raw().to_vec(),
        Body::SevenBit(b) | Body::EightBit(b) => b.get_raw().to_vec(),
        Body::Binary(b) => b.get_raw().to_vec(),
    }
}

fn trim_delimiter_break_bytes(data: &mut Vec<u8>) {
    if data.ends_with(b"\r\n") {
        data.truncate(data.len() - 2);
    } else if data.ends_with(b"\n") {
        data.pop();
    }
}

fn trim_delimiter_break(text: &mut String) {
    if text.ends_with("\r\n") {
        text.truncate(text.len() - 2);
    } else if text.ends_with('\n') {
        text.pop();
    }
}
