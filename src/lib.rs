//! # rmht
//!
//! A Rust MHT (MHTML) packer/unpacker.
//!
//! An MHT archive bundles an HTML page with its embedded resources in a
//! single `multipart/related` document. This library converts such an
//! archive into a directory tree whose file paths mirror each resource's
//! `Content-Location`, and packs a directory tree back into an archive.
//!
//! ## Features
//!
//! - Unpack archives from a local file, stdin, or an HTTP/HTTPS URL
//! - Pack a directory into a deterministic archive
//! - Content types inferred from file extensions
//! - Root document always materialized as `index.html`
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use rmht::io::{ArchiveEncoding, LocalFileSource, read_archive};
//! use rmht::mht::{UnpackOptions, unpack_all};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let source = LocalFileSource::new("page.mht")?;
//!     let container = read_archive(&source, ArchiveEncoding::default()).await?;
//!
//!     let written = unpack_all(&container, Path::new("page"), &UnpackOptions::default()).await?;
//!     println!("unpacked {written} files");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod mht;

pub use cli::Cli;
pub use error::{MhtError, Result};
pub use mht::{Container, MhtExtractor, MhtPacker, PackOptions, Part, PartBody, UnpackOptions};
