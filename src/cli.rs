use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::io::{ArchiveEncoding, STDIO_MARKER};
use crate::mht::{PackOptions, UnpackOptions};

#[derive(Parser, Debug)]
#[command(name = "rmht")]
#[command(version)]
#[command(about = "Unpack an MHT archive into a directory, or pack a directory into one", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["pack", "unpack"])))]
#[command(after_help = "Examples:\n  \
  rmht -u page.mht page/                 unpack page.mht into page/\n  \
  rmht -p page.mht page/                 pack page/ back into page.mht\n  \
  rmht -u --first-only - page/ < a.mht   extract only the main document from stdin\n  \
  rmht -u https://example.com/a.mht a/   unpack a remote archive")]
pub struct Cli {
    /// MHT file path, HTTP URL (unpack only), or "-" for stdin/stdout
    #[arg(value_name = "MHT")]
    pub mht: String,

    /// Directory to create to store parts in, or read them from
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Pack files under DIR into an MHT (text files must be UTF-8, anything else aborts)
    #[arg(short = 'p', long)]
    pub pack: bool,

    /// Unpack MHT into a new DIR
    #[arg(short = 'u', long)]
    pub unpack: bool,

    /// Write text parts from their raw payload, for archives with abnormal html encodings
    #[arg(long)]
    pub fix_html_7bit: bool,

    /// Only extract 1 file, hopefully the main html
    #[arg(long)]
    pub first_only: bool,

    /// Overwrite an existing MHT file without prompting
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Never overwrite existing files while unpacking
    #[arg(short = 'n', long)]
    pub no_clobber: bool,

    /// Refuse to pack a directory without a top-level index.html
    #[arg(long)]
    pub require_root: bool,

    /// The encoding of the MHT file: "utf-8-sig" or any label such as utf-8, latin1, gb18030
    #[arg(long, value_name = "ENC", default_value = "utf-8-sig")]
    pub mht_enc: ArchiveEncoding,

    /// Verbose logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Direction of the conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pack,
    Unpack,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.pack { Mode::Pack } else { Mode::Unpack }
    }

    pub fn is_stdio(&self) -> bool {
        self.mht == STDIO_MARKER
    }

    pub fn unpack_options(&self) -> UnpackOptions {
        UnpackOptions {
            fix_html_7bit: self.fix_html_7bit,
            first_only: self.first_only,
            allow_overwrite: !self.no_clobber,
        }
    }

    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            require_root: self.require_root,
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
