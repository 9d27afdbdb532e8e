use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileSaveError {
    #[error("invalid file name: {0}")]
    InvalidName(String),
    #[error("failed to save {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Hands finished bytes to the user under a given file name, in two steps:
/// `stage` writes them aside, and only `commit` makes them visible under the
/// final name. Dropping a staged download discards it.
#[async_trait::async_trait]
pub trait FileSaver: Send + Sync {
    async fn stage(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Box<dyn StagedDownload>, FileSaveError>;
}

#[async_trait::async_trait]
pub trait StagedDownload: Send {
    async fn commit(self: Box<Self>) -> Result<PathBuf, FileSaveError>;
}

/// Saves into a fixed directory.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl FileSaver for DirectorySaver {
    async fn stage(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Box<dyn StagedDownload>, FileSaveError> {
        let name = final_component(filename)?;
        let target = self.dir.join(name);
        let handle = DownloadHandle::acquire(self.dir.join(format!(".{name}.part")));

        tokio::fs::write(handle.path(), bytes)
            .await
            .map_err(|source| FileSaveError::Io {
                path: target.clone(),
                source,
            })?;

        Ok(Box::new(StagedFile {
            handle,
            target,
            len: bytes.len(),
        }))
    }
}

struct StagedFile {
    handle: DownloadHandle,
    target: PathBuf,
    len: usize,
}

#[async_trait::async_trait]
impl StagedDownload for StagedFile {
    async fn commit(self: Box<Self>) -> Result<PathBuf, FileSaveError> {
        let StagedFile {
            handle,
            target,
            len,
        } = *self;
        tokio::fs::rename(handle.path(), &target)
            .await
            .map_err(|source| FileSaveError::Io {
                path: target.clone(),
                source,
            })?;

        tracing::info!(path = %target.display(), bytes = len, "file saved");
        Ok(target)
    }
}

/// Strips any directories so a crafted name cannot escape the target dir.
fn final_component(filename: &str) -> Result<&str, FileSaveError> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| FileSaveError::InvalidName(filename.to_string()))
}

/// Staging file for one save. Always removed on drop; after a successful
/// rename there is nothing left to remove.
struct DownloadHandle {
    staging: PathBuf,
}

impl DownloadHandle {
    fn acquire(staging: PathBuf) -> Self {
        tracing::debug!(path = %staging.display(), "download handle acquired");
        Self { staging }
    }

    fn path(&self) -> &Path {
        &self.staging
    }
}

impl Drop for DownloadHandle {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.staging) {
            Ok(()) => tracing::debug!(path = %self.staging.display(), "staging file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.staging.display(), error = %err, "failed to remove staging file")
            }
        }
        tracing::debug!(path = %self.staging.display(), "download handle released");
    }
}
