use super::resolver;

/// Content type of the archive envelope.
pub const MULTIPART_RELATED: &str = "multipart/related";

/// Content type of the root document, also declared as the envelope's `type` parameter.
pub const ROOT_CONTENT_TYPE: &str = "text/html";

/// Charset assigned to every text part this crate produces.
pub const UTF_8: &str = "utf-8";

/// Decoded body of a part.
///
/// Text and binary are resolved once, when the part is parsed or built,
/// so the unpacker and writer never inspect content types again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text {
        charset: Option<String>,
        content: String,
    },
    Binary(Vec<u8>),
}

impl PartBody {
    pub fn is_text(&self) -> bool {
        matches!(self, PartBody::Text { .. })
    }

    /// Size of the decoded body in bytes.
    pub fn len(&self) -> usize {
        match self {
            PartBody::Text { content, .. } => content.len(),
            PartBody::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Body as bytes, text re-encoded as UTF-8.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PartBody::Text { content, .. } => content.as_bytes().to_vec(),
            PartBody::Binary(bytes) => bytes.clone(),
        }
    }
}

/// One unit of content inside a [`Container`], mapping to one file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Lower-cased `maintype/subtype`.
    pub content_type: String,
    /// Relative path of the resource; `None` marks the root document.
    pub location: Option<String>,
    pub body: PartBody,
    /// Payload exactly as it appeared in the archive, before transfer decoding.
    /// Only parts read from an archive carry it.
    pub raw_payload: Option<Vec<u8>>,
}

impl Part {
    /// The root document: `text/html`, UTF-8, no location.
    pub fn root(content: String) -> Self {
        Self {
            content_type: ROOT_CONTENT_TYPE.to_string(),
            location: None,
            body: PartBody::Text {
                charset: Some(UTF_8.to_string()),
                content,
            },
            raw_payload: None,
        }
    }

    pub fn text(location: impl Into<String>, content_type: &str, content: String) -> Self {
        Self {
            content_type: content_type.to_ascii_lowercase(),
            location: Some(location.into()),
            body: PartBody::Text {
                charset: Some(UTF_8.to_string()),
                content,
            },
            raw_payload: None,
        }
    }

    pub fn binary(location: impl Into<String>, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.to_ascii_lowercase(),
            location: Some(location.into()),
            body: PartBody::Binary(bytes),
            raw_payload: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.location.is_none()
    }

    pub fn maintype(&self) -> &str {
        self.content_type
            .split_once('/')
            .map_or(self.content_type.as_str(), |(main, _)| main)
    }

    pub fn subtype(&self) -> &str {
        self.content_type
            .split_once('/')
            .map_or("", |(_, sub)| sub)
    }

    pub fn charset(&self) -> Option<&str> {
        match &self.body {
            PartBody::Text { charset, .. } => charset.as_deref(),
            PartBody::Binary(_) => None,
        }
    }

    /// Location the part is materialized at: its own, or `index.html` for the root.
    pub fn file_name(&self) -> &str {
        self.location
            .as_deref()
            .unwrap_or(resolver::root_file_name())
    }
}

/// In-memory model of an archive: an ordered sequence of zero or more parts.
///
/// A single-part archive is simply a container of length one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    parts: Vec<Part>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Part> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// First part without a location, if any.
    pub fn root(&self) -> Option<&Part> {
        self.parts.iter().find(|p| p.is_root())
    }
}

impl From<Vec<Part>> for Container {
    fn from(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Part;
    type IntoIter = std::slice::Iter<'a, Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

impl IntoIterator for Container {
    type Item = Part;
    type IntoIter = std::vec::IntoIter<Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}
