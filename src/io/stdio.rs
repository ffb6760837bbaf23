use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{ArchiveSink, ArchiveSource};
use crate::error::Result;

/// Archive piped in on stdin
#[derive(Debug, Default)]
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArchiveSource for StdinSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        Ok(buf)
    }

    fn name(&self) -> String {
        "<stdin>".to_string()
    }
}

/// Archive piped out on stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArchiveSink for StdoutSink {
    async fn write_all(&self, data: &[u8]) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(data).await?;
        stdout.flush().await?;
        Ok(())
    }

    // A byte-order mark would corrupt whatever the archive is piped into.
    fn accepts_bom(&self) -> bool {
        false
    }
}
