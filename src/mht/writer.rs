//! Archive serializer.
//!
//! Output is fully determined by the container: CRLF line endings, a fixed
//! boundary, and base64 bodies wrapped at 76 columns. The boundary cannot
//! collide with content because the base64 alphabet has no `-` and every
//! header line starts with its name.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::structures::{Container, MULTIPART_RELATED, Part, PartBody, ROOT_CONTENT_TYPE, UTF_8};

/// Multipart boundary used for every archive.
pub const BOUNDARY: &str = "----=_NextPart_rmht_000";

const CRLF: &str = "\r\n";
const LINE_WIDTH: usize = 76;

/// Serialize a container as a `multipart/related` document.
pub fn write_archive(container: &Container) -> Vec<u8> {
    let mut out = String::new();

    push_header(&mut out, "MIME-Version", "1.0");
    push_header(
        &mut out,
        "Content-Type",
        &format!("{MULTIPART_RELATED}; type=\"{ROOT_CONTENT_TYPE}\"; boundary=\"{BOUNDARY}\""),
    );
    out.push_str(CRLF);

    for part in container {
        out.push_str("--");
        out.push_str(BOUNDARY);
        out.push_str(CRLF);
        write_part(&mut out, part);
    }

    out.push_str("--");
    out.push_str(BOUNDARY);
    out.push_str("--");
    out.push_str(CRLF);

    out.into_bytes()
}

fn write_part(out: &mut String, part: &Part) {
    // Text is always stored as a Rust string, so it always goes out as UTF-8.
    let content_type = match part.body {
        PartBody::Text { .. } => format!("{}; charset=\"{UTF_8}\"", part.content_type),
        PartBody::Binary(_) => part.content_type.clone(),
    };
    push_header(out, "Content-Type", &content_type);
    push_header(out, "Content-Transfer-Encoding", "base64");
    if let Some(location) = &part.location {
        push_header(out, "Content-Location", &encode_header_value(location));
    }
    out.push_str(CRLF);

    let encoded = match &part.body {
        PartBody::Text { content, .. } => STANDARD.encode(content.as_bytes()),
        PartBody::Binary(bytes) => STANDARD.encode(bytes),
    };
    let mut start = 0;
    while start < encoded.len() {
        let end = (start + LINE_WIDTH).min(encoded.len());
        out.push_str(&encoded[start..end]);
        out.push_str(CRLF);
        start = end;
    }
}

fn push_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str(CRLF);
}

/// RFC 2047 encoded-word for values that are not plain printable ASCII.
fn encode_header_value(value: &str) -> String {
    if value.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        value.to_string()
    } else {
        format!("=?{UTF_8}?b?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
