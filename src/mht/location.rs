use std::path::{Component, Path, PathBuf};

use crate::error::{MhtError, Result};

/// Map a part location onto a path relative to the unpack root.
///
/// Empty and `.` segments and any leading `/` are dropped. A `..` segment
/// would escape the root and is rejected, as is a location with no
/// segments left.
pub fn location_to_path(location: &str) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for segment in location.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(MhtError::InvalidLocation(location.to_string())),
            s => out.push(s),
        }
    }

    if out.as_os_str().is_empty() {
        return Err(MhtError::InvalidLocation(location.to_string()));
    }
    Ok(out)
}

/// Build the slash-separated location of `file` relative to `root`.
pub fn path_to_location(root: &Path, file: &Path) -> Result<String> {
    let rel = file
        .strip_prefix(root)
        .map_err(|_| MhtError::InvalidLocation(file.to_string_lossy().into_owned()))?;

    let mut segments = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
            Component::CurDir => continue,
            _ => return Err(MhtError::InvalidLocation(rel.to_string_lossy().into_owned())),
        }
    }

    if segments.is_empty() {
        return Err(MhtError::InvalidLocation(String::new()));
    }
    Ok(segments.join("/"))
}
