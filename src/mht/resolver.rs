//! Content-type inference and naming conventions shared by packer and unpacker.
//!
//! Everything here is a pure function over a static registry, so inference
//! is deterministic and never fails: unknown extensions simply resolve to
//! [`default_type_for_unknown`].

/// File name the root document (the part without a location) is materialized as.
const ROOT_FILE_NAME: &str = "index.html";

/// Fallback content type when the extension is not in the registry.
const DEFAULT_TYPE: &str = "application/octet-stream";

/// Extension to content type registry, matching the conventional system MIME database.
///
/// Extensions are lower-case and looked up case-insensitively.
static REGISTRY: &[(&str, &str)] = &[
    // Documents
    ("html", "text/html"),
    ("htm", "text/html"),
    ("shtml", "text/html"),
    ("xhtml", "application/xhtml+xml"),
    ("xht", "application/xhtml+xml"),
    ("mht", "message/rfc822"),
    ("mhtml", "message/rfc822"),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("tsv", "text/tab-separated-values"),
    ("xml", "text/xml"),
    ("xsl", "application/xml"),
    ("rtf", "application/rtf"),
    ("pdf", "application/pdf"),
    ("ics", "text/calendar"),
    ("vtt", "text/vtt"),
    // Stylesheets and scripts
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("wasm", "application/wasm"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("ico", "image/vnd.microsoft.icon"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("eot", "application/vnd.ms-fontobject"),
    // Audio and video
    ("mp3", "audio/mpeg"),
    ("wav", "audio/x-wav"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("flac", "audio/flac"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    // Archives and embeds
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
    ("swf", "application/x-shockwave-flash"),
];

/// Infer a content type from a file name's extension.
///
/// Only the final extension counts (`a.tar.gz` → `gz`). Names without an
/// extension, including dot-files such as `.htaccess`, resolve to `None`.
pub fn type_for_extension(filename: &str) -> Option<&'static str> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    REGISTRY
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Whether a content type's maintype is `text`.
pub fn is_text_type(mime: &str) -> bool {
    mime.split_once('/')
        .is_some_and(|(main, _)| main.trim().eq_ignore_ascii_case("text"))
}

pub const fn default_type_for_unknown() -> &'static str {
    DEFAULT_TYPE
}

pub const fn root_file_name() -> &'static str {
    ROOT_FILE_NAME
}

/// Inferred type for `filename`, or the binary fallback.
pub fn resolve_type(filename: &str) -> &'static str {
    type_for_extension(filename).unwrap_or(DEFAULT_TYPE)
}
