use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// A download in progress, backed by a temp file next to its final path.
///
/// Dropping it without calling [`PartialDownload::finish`] removes the temp file,
/// so a failed stream never leaves a truncated document behind.
pub struct PartialDownload {
    // Declared before `tmp` so the handle closes before the temp file is unlinked.
    file: tokio::fs::File,
    tmp: NamedTempFile,
    written: u64,
    hasher: Sha256,
}

/// A download moved to its final name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFile {
    pub bytes: u64,
    /// Lower-case hex SHA-256 of the file content.
    pub sha256: String,
}

impl PartialDownload {
    pub fn create_in(dir: &Path) -> Result<Self, PersistError> {
        ensure_output_dir(dir)?;
        let tmp = tempfile::Builder::new()
            .prefix(".docfetch-")
            .suffix(".part")
            .tempfile_in(dir)?;
        let file = tokio::fs::File::from_std(tmp.reopen()?);
        Ok(Self {
            file,
            tmp,
            written: 0,
            hasher: Sha256::new(),
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<u64, PersistError> {
        self.file.write_all(chunk).await?;
        self.hasher.update(chunk);
        self.written += chunk.len() as u64;
        Ok(self.written)
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        self.tmp.path()
    }

    /// Flush, sync and move the temp file to `target`.
    pub async fn finish(self, target: &Path) -> Result<PersistedFile, PersistError> {
        let Self {
            mut file,
            tmp,
            written,
            hasher,
        } = self;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
        Ok(PersistedFile {
            bytes: written,
            sha256: to_hex(&hasher.finalize()),
        })
    }
}

/// Size of the file at `path`; `None` when it is missing.
pub fn existing_file_len(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// SHA-256 of a file already on disk, as lower-case hex.
pub fn hash_file(path: &Path) -> Result<String, PersistError> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("{0:?} does not exist after download")]
    Missing(PathBuf),
    #[error("{0:?} is empty after download")]
    Empty(PathBuf),
    #[error("could not remove empty file {path:?}: {message}")]
    Cleanup { path: PathBuf, message: String },
}

/// Confirm a finished download exists and is non-empty.
///
/// An empty file is deleted before the error is returned.
pub fn verify_download(path: &Path) -> Result<u64, VerifyError> {
    match existing_file_len(path) {
        None => Err(VerifyError::Missing(path.to_path_buf())),
        Some(0) => {
            fs::remove_file(path).map_err(|err| VerifyError::Cleanup {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            Err(VerifyError::Empty(path.to_path_buf()))
        }
        Some(len) => Ok(len),
    }
}
