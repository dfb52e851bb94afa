use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writable if a temp file can be created there.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file and rename, so a failed or
/// interrupted download never leaves a truncated clip behind.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Opens a temp file in the target directory for incremental writes.
    pub fn stage(&self) -> Result<StagedFile, PersistError> {
        ensure_output_dir(&self.dir)?;
        Ok(StagedFile {
            dir: self.dir.clone(),
            tmp: NamedTempFile::new_in(&self.dir)?,
            written: 0,
        })
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let mut staged = self.stage()?;
        staged.append(content)?;
        staged.commit(filename)
    }
}

/// A clip being written. Dropping it without [`StagedFile::commit`] deletes
/// the temp file and leaves the directory as it was.
pub struct StagedFile {
    dir: PathBuf,
    tmp: NamedTempFile,
    written: u64,
}

impl StagedFile {
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes to disk and renames over `{dir}/{filename}`. The rename
    /// replaces an earlier copy in one step.
    pub fn commit(mut self, filename: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;
        self.tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
