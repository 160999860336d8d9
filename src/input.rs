//! Code piped on standard input, staged as a temporary source file.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncReadExt};

/// A source file written from stdin. Deleted on drop.
#[derive(Debug)]
pub struct StdinSource {
    path: PathBuf,
    file_name: String,
}

impl StdinSource {
    /// Read all of `reader` into `<uuid>.<extension>` inside `dir`.
    pub async fn capture<R>(reader: &mut R, dir: &Path, extension: &str) -> std::io::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut code = Vec::new();
        reader.read_to_end(&mut code).await?;

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &code).await?;
        tracing::debug!(path = %path.display(), bytes = code.len(), "staged stdin source");

        Ok(Self { path, file_name })
    }

    /// File name relative to the capture directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StdinSource {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), "failed to remove stdin source: {}", e);
        }
    }
}
