//! MHT (MHTML) archive packing and unpacking.
//!
//! An MHT archive is a `multipart/related` MIME document bundling an HTML
//! page with the resources it embeds. This module maps such an archive onto a
//! directory tree and back.
//!
//! ## Architecture
//!
//! - [`structures`]: the in-memory [`Container`] of typed, named [`Part`]s
//! - [`resolver`]: content-type inference from file extensions
//! - [`parser`] / [`writer`]: archive bytes to and from a [`Container`]
//! - [`extractor`]: materializes a container as files ([`MhtExtractor`])
//! - [`packer`]: builds a container from a directory ([`MhtPacker`])
//!
//! ## Mapping
//!
//! Each part's `Content-Location` is its path relative to the directory
//! root. The one part without a location is the root document and lives at
//! `index.html`. Text parts are written as UTF-8; everything else is written
//! byte for byte.
//!
//! ## Limitations
//!
//! - Nested multiparts are not descended into
//! - Parts that map to the same path overwrite each other
//! - The whole archive is held in memory
//! - Packing requires text files to be UTF-8; any other encoding is a fatal
//!   decode error

pub mod extractor;
pub mod location;
pub mod packer;
pub mod parser;
pub mod resolver;
pub mod structures;
pub mod writer;

pub use extractor::{MhtExtractor, UnpackOptions, unpack_all};
pub use packer::{MhtPacker, PackOptions, pack_all};
pub use parser::parse_archive;
pub use structures::{Container, Part, PartBody};
pub use writer::write_archive;
