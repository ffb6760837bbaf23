//! Main entry point for the rmht CLI application.
//!
//! This binary unpacks an MHT archive into a directory tree, or packs a
//! directory tree back into an archive.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use rmht::MhtError;
use rmht::cli::{Cli, Mode};
use rmht::io::{format_size, open_sink, open_source, read_archive, write_container};
use rmht::mht::{pack_all, unpack_all};

/// Application entry point.
///
/// Everything runs on a single thread: each invocation is one linear pass
/// over one archive and one directory tree.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            exit_code(&e)
        }
    }
}

/// Log to stderr, since stdout may be carrying the archive.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<MhtError>() {
        Some(MhtError::ArchiveExists(_)) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match cli.mode() {
        Mode::Unpack => unpack(cli).await,
        Mode::Pack => pack(cli).await,
    }
}

/// Unpack the archive into `cli.dir`.
///
/// The source is opened before the target directory is created, so a
/// missing archive leaves nothing behind.
async fn unpack(cli: &Cli) -> Result<()> {
    let source = open_source(&cli.mht)?;
    prepare_target_dir(&cli.dir, cli.overwrite)?;

    info!("Unpacking...");
    let container = read_archive(source.as_ref(), cli.mht_enc).await?;
    let count = unpack_all(&container, &cli.dir, &cli.unpack_options()).await?;

    info!("Done.");
    info!("Unpacked {} files.", count);
    Ok(())
}

/// Pack `cli.dir` into the archive.
///
/// The archive target is validated first; it is only written once the
/// whole directory has been read.
async fn pack(cli: &Cli) -> Result<()> {
    let sink = open_sink(&cli.mht, cli.overwrite)?;

    info!("Packing...");
    let container = pack_all(&cli.dir, &cli.pack_options()).await?;
    let written = write_container(sink.as_ref(), &container, cli.mht_enc).await?;
    debug!("wrote {}", format_size(written as u64));

    info!("Done.");
    info!("Packed {} files.", container.len());
    Ok(())
}

/// Create the unpack directory. An existing one is reused.
fn prepare_target_dir(dir: &Path, overwrite: bool) -> Result<()> {
    if dir.is_dir() {
        if overwrite {
            warn!("target directory {} exists", dir.display());
        }
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))
}
