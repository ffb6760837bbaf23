use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{MhtError, Result};

use super::location::location_to_path;
use super::resolver;
use super::structures::{Container, Part, PartBody};

/// Options controlling how parts are materialized.
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Write text parts from their un-decoded payload instead of the decoded text.
    pub fix_html_7bit: bool,
    /// Stop after the first part, normally the main document.
    pub first_only: bool,
    /// Replace files that already exist. When false they are skipped.
    pub allow_overwrite: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            fix_html_7bit: false,
            first_only: false,
            allow_overwrite: true,
        }
    }
}

/// Writes the parts of a [`Container`] as files under a root directory.
pub struct MhtExtractor {
    root: PathBuf,
    options: UnpackOptions,
}

impl MhtExtractor {
    pub fn new(root: impl Into<PathBuf>, options: UnpackOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every part in container order, returning how many files were written.
    ///
    /// Parts sharing a destination overwrite each other, last one wins.
    pub async fn unpack_all(&self, container: &Container) -> Result<usize> {
        let mut written = 0;
        for part in container {
            if self.extract_part(part).await? {
                written += 1;
            }
            if self.options.first_only {
                break;
            }
        }
        Ok(written)
    }

    /// Write a single part, returning false when it was skipped.
    pub async fn extract_part(&self, part: &Part) -> Result<bool> {
        let output_path = self.output_path(part)?;

        if !self.options.allow_overwrite {
            let exists = fs::try_exists(&output_path)
                .await
                .map_err(|e| MhtError::file(&output_path, e))?;
            if exists {
                warn!("skipping {} (file exists)", output_path.display());
                return Ok(false);
            }
        }

        let content = self.part_bytes(part);
        debug!(
            "writing {} to {}, {} bytes",
            part.content_type,
            part.file_name(),
            content.len()
        );

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| MhtError::file(parent, e))?;
            }
        }

        fs::write(&output_path, &content)
            .await
            .map_err(|e| MhtError::file(&output_path, e))?;
        Ok(true)
    }

    fn output_path(&self, part: &Part) -> Result<PathBuf> {
        let rel = match &part.location {
            Some(location) => location_to_path(location)?,
            None => PathBuf::from(resolver::root_file_name()),
        };
        Ok(self.root.join(rel))
    }

    fn part_bytes(&self, part: &Part) -> Vec<u8> {
        match (&part.body, &part.raw_payload) {
            (PartBody::Text { .. }, Some(raw)) if self.options.fix_html_7bit => raw.clone(),
            (body, _) => body.to_bytes(),
        }
    }
}

/// Unpack `container` into `root` with the given options.
pub async fn unpack_all(container: &Container, root: &Path, options: &UnpackOptions) -> Result<usize> {
    MhtExtractor::new(root, options.clone())
        .unpack_all(container)
        .await
}
