mod http;
mod local;
mod stdio;

pub use http::HttpSource;
pub use local::{LocalFileSink, LocalFileSource};
pub use stdio::{StdinSource, StdoutSink};

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{MhtError, Result};
use crate::mht::{Container, parse_archive, write_archive};

/// Archive argument standing for stdin (unpack) or stdout (pack).
pub const STDIO_MARKER: &str = "-";

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where an archive is read from
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Read the complete archive into memory
    async fn read_all(&self) -> Result<Vec<u8>>;

    /// Human readable name for log messages
    fn name(&self) -> String;
}

/// Where a packed archive is written to
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Write the complete archive in one go
    async fn write_all(&self, data: &[u8]) -> Result<()>;

    /// Whether the archive encoding's byte-order mark may be written
    fn accepts_bom(&self) -> bool {
        true
    }
}

/// Text encoding of the archive stream itself.
///
/// Any WHATWG encoding label is accepted (`utf-8`, `latin1`, `gb18030`, ...),
/// plus `utf-8-sig`: UTF-8 behind an optional byte-order mark. The archive is
/// transcoded to UTF-8 before parsing and back after serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEncoding {
    encoding: &'static Encoding,
    sig: bool,
}

impl ArchiveEncoding {
    /// Plain UTF-8, a leading byte-order mark is kept.
    pub fn utf_8() -> Self {
        ArchiveEncoding {
            encoding: encoding_rs::UTF_8,
            sig: false,
        }
    }

    /// UTF-8 with an optional byte-order mark.
    pub fn utf_8_sig() -> Self {
        ArchiveEncoding {
            encoding: encoding_rs::UTF_8,
            sig: true,
        }
    }

    /// Look an encoding up by label, case-insensitively.
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if matches!(label.as_str(), "utf-8-sig" | "utf8-sig" | "utf_8_sig") {
            return Some(Self::utf_8_sig());
        }
        Encoding::for_label(label.as_bytes())
            .or_else(|| Encoding::for_label(label.replace('_', "-").as_bytes()))
            .map(|encoding| ArchiveEncoding {
                encoding,
                sig: false,
            })
    }

    pub fn name(&self) -> &'static str {
        if self.sig { "utf-8-sig" } else { self.encoding.name() }
    }

    fn is_utf8(&self) -> bool {
        self.encoding == encoding_rs::UTF_8
    }

    /// Transcode raw archive bytes into the UTF-8 the parser reads.
    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        if self.is_utf8() {
            let data = if self.sig {
                data.strip_prefix(BOM).unwrap_or(data)
            } else {
                data
            };
            return Ok(Cow::Borrowed(data));
        }

        let (text, had_errors) = self.encoding.decode_with_bom_removal(data);
        if had_errors {
            return Err(MhtError::Decode(format!("archive is not valid {}", self.name())));
        }
        Ok(match text {
            Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
            Cow::Owned(text) => Cow::Owned(text.into_bytes()),
        })
    }

    /// Transcode a serialized archive for writing. The byte-order mark of
    /// `utf-8-sig` is only added `with_bom`.
    pub fn encode(&self, archive: &[u8], with_bom: bool) -> Result<Vec<u8>> {
        if self.is_utf8() {
            let mut data = Vec::with_capacity(archive.len() + BOM.len());
            if self.sig && with_bom {
                data.extend_from_slice(BOM);
            }
            data.extend_from_slice(archive);
            return Ok(data);
        }

        let text = std::str::from_utf8(archive).map_err(|e| MhtError::Decode(e.to_string()))?;
        // encoding_rs only encodes to ASCII-compatible encodings.
        if self.encoding == encoding_rs::UTF_16LE {
            return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
        }
        if self.encoding == encoding_rs::UTF_16BE {
            return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
        }

        let (data, _, unmappable) = self.encoding.encode(text);
        if unmappable {
            return Err(MhtError::Decode(format!(
                "archive cannot be written as {}",
                self.name()
            )));
        }
        Ok(data.into_owned())
    }
}

impl Default for ArchiveEncoding {
    fn default() -> Self {
        Self::utf_8_sig()
    }
}

impl FromStr for ArchiveEncoding {
    type Err = String;

    fn from_str(label: &str) -> std::result::Result<Self, Self::Err> {
        Self::for_label(label).ok_or_else(|| format!("unknown encoding {label:?}"))
    }
}

impl fmt::Display for ArchiveEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn is_http_url(archive: &str) -> bool {
    archive.starts_with("http://") || archive.starts_with("https://")
}

/// Open the archive named on the command line for reading.
pub fn open_source(archive: &str) -> Result<Box<dyn ArchiveSource>> {
    if archive == STDIO_MARKER {
        Ok(Box::new(StdinSource::new()))
    } else if is_http_url(archive) {
        Ok(Box::new(HttpSource::new(archive.to_string())?))
    } else {
        Ok(Box::new(LocalFileSource::new(archive)?))
    }
}

/// Open the archive named on the command line for writing.
///
/// An existing archive file is refused unless `overwrite` is set. This is
/// checked here, before any packing work starts.
pub fn open_sink(archive: &str, overwrite: bool) -> Result<Box<dyn ArchiveSink>> {
    if archive == STDIO_MARKER {
        Ok(Box::new(StdoutSink::new()))
    } else if is_http_url(archive) {
        Err(MhtError::Unsupported(format!("cannot pack into {archive}")))
    } else {
        Ok(Box::new(LocalFileSink::new(archive, overwrite)?))
    }
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Read and parse an archive.
pub async fn read_archive<S: ArchiveSource + ?Sized>(
    source: &S,
    encoding: ArchiveEncoding,
) -> Result<Container> {
    let data = source.read_all().await?;
    debug!("read {} bytes from {}", data.len(), source.name());
    parse_archive(&encoding.decode(&data)?)
}

/// Serialize a container and write it out, returning the bytes written.
pub async fn write_container<S: ArchiveSink + ?Sized>(
    sink: &S,
    container: &Container,
    encoding: ArchiveEncoding,
) -> Result<usize> {
    let data = encoding.encode(&write_archive(container), sink.accepts_bom())?;
    sink.write_all(&data).await?;
    Ok(data.len())
}
