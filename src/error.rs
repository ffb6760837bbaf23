use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while packing or unpacking an archive.
///
/// Every variant is fatal to the current invocation.
#[derive(Debug, Error)]
pub enum MhtError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode: {0}")]
    Decode(String),

    #[error("archive {} exists, won't overwrite", .0.display())]
    ArchiveExists(PathBuf),

    #[error("no top-level index.html to use as the root document")]
    MissingRoot,

    #[error("invalid location: {0:?}")]
    InvalidLocation(String),

    #[error("http: {0}")]
    Http(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl MhtError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MhtError::File {
            path: path.into(),
            source,
        }
    }
}

impl From<mailparse::MailParseError> for MhtError {
    fn from(e: mailparse::MailParseError) -> Self {
        MhtError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for MhtError {
    fn from(e: reqwest::Error) -> Self {
        MhtError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MhtError>;
