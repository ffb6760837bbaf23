//! Directory packer.
//!
//! Text files (by inferred MIME type, plus the root `index.html`) are stored
//! as text and must be valid UTF-8: a file in any other encoding aborts the
//! whole pack with [`MhtError::Decode`] naming its location. Convert such
//! files first, or give them an extension that maps to a binary type.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{MhtError, Result};

use super::location::path_to_location;
use super::resolver;
use super::structures::{Container, Part};

/// Options controlling how a directory is packed.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Fail with [`MhtError::MissingRoot`] when there is no top-level `index.html`.
    pub require_root: bool,
}

/// Builds a [`Container`] from the files under a root directory.
pub struct MhtPacker {
    root: PathBuf,
    options: PackOptions,
}

impl MhtPacker {
    pub fn new(root: impl Into<PathBuf>, options: PackOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every regular file under the root as `(location, path)`.
    ///
    /// Entries are sorted by name within each directory so the order, and
    /// therefore the archive, is reproducible.
    pub fn list_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        for ent in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let ent = ent.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                let msg = e.to_string();
                let io = e.into_io_error().unwrap_or_else(|| std::io::Error::other(msg));
                MhtError::file(path, io)
            })?;

            let is_file =
                ent.file_type().is_file() || (ent.path_is_symlink() && ent.path().is_file());
            if !is_file {
                continue;
            }

            let location = path_to_location(&self.root, ent.path())?;
            files.push((location, ent.path().to_path_buf()));
        }
        Ok(files)
    }

    /// Pack every file into a container, the top-level `index.html` becoming the root part.
    pub async fn pack_all(&self) -> Result<Container> {
        let files = self.list_files()?;

        if self.options.require_root && !files.iter().any(|(loc, _)| is_root_location(loc)) {
            return Err(MhtError::MissingRoot);
        }

        let mut container = Container::new();
        for (location, path) in files {
            container.push(pack_file(location, &path).await?);
        }
        Ok(container)
    }
}

async fn pack_file(location: String, path: &Path) -> Result<Part> {
    let data = fs::read(path).await.map_err(|e| MhtError::file(path, e))?;

    if is_root_location(&location) {
        debug!("reading {} as root document", location);
        return Ok(Part::root(decode_text(&location, data)?));
    }

    let mime = resolver::resolve_type(&location);
    debug!("reading {} as {}", location, mime);

    if resolver::is_text_type(mime) {
        let content = decode_text(&location, data)?;
        Ok(Part::text(location, mime, content))
    } else {
        Ok(Part::binary(location, mime, data))
    }
}

fn is_root_location(location: &str) -> bool {
    location == resolver::root_file_name()
}

fn decode_text(location: &str, data: Vec<u8>) -> Result<String> {
    String::from_utf8(data)
        .map_err(|e| MhtError::Decode(format!("{location}: not UTF-8 text ({e})")))
}

/// Pack the directory at `root` with the given options.
pub async fn pack_all(root: &Path, options: &PackOptions) -> Result<Container> {
    MhtPacker::new(root, options.clone()).pack_all().await
}
