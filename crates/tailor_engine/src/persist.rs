use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

const STAGING_PREFIX: &str = ".tailor-download-";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {path:?} as download directory: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` (and parents) if missing; fails when it names a file.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let output_dir_error = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    fs::create_dir_all(dir).map_err(|e| output_dir_error(e.to_string()))?;
    if !dir.is_dir() {
        return Err(output_dir_error("not a directory".to_string()));
    }
    Ok(())
}

/// Directory that receives downloaded resumes.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Opens a hidden temp file next to the final `filename`. Nothing appears
    /// under `filename` until [`StagedArtifact::commit`].
    pub fn stage(&self, filename: &str) -> Result<StagedArtifact, PersistError> {
        ensure_output_dir(&self.dir)?;
        let tmp = Builder::new().prefix(STAGING_PREFIX).tempfile_in(&self.dir)?;
        Ok(StagedArtifact {
            tmp,
            target: self.dir.join(filename),
            written: 0,
        })
    }
}

/// A download in progress. Dropping it without committing removes the
/// temp file.
pub struct StagedArtifact {
    tmp: NamedTempFile,
    target: PathBuf,
    written: u64,
}

impl StagedArtifact {
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Syncs the temp file and renames it over the target, replacing an
    /// earlier download of the same name.
    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;
        self.tmp
            .persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target)
    }
}
