use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tunefetch_logging::tune_warn;

use crate::audio_file_name;

const DELIVERY_DIR_PREFIX: &str = "delivery-";

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("scratch directory {path} unusable: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScratchError {
    fn dir(path: &Path, source: io::Error) -> Self {
        Self::Dir {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Creates `dir` if needed and proves a delivery file can be written there by
/// reserving, filling and releasing one.
pub fn ensure_scratch_dir(dir: &Path) -> Result<(), ScratchError> {
    fs::create_dir_all(dir).map_err(|err| ScratchError::dir(dir, err))?;
    let check = ScratchFile::reserve(dir, "write-check")?;
    fs::write(check.path(), b"").map_err(|err| ScratchError::dir(dir, err))?;
    check.release();
    Ok(())
}

/// One delivery's audio file at `{dir}/delivery-XXXX/{sanitized title}.mp3`.
///
/// The private subdirectory keeps concurrent deliveries of the same title
/// apart while the file keeps the readable name. Directory and file are
/// removed when this value is released or dropped.
#[derive(Debug)]
pub struct ScratchFile {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchFile {
    /// Creates the private subdirectory; the file itself is not created yet.
    pub fn reserve(dir: &Path, title: &str) -> Result<Self, ScratchError> {
        let private = tempfile::Builder::new()
            .prefix(DELIVERY_DIR_PREFIX)
            .tempdir_in(dir)
            .map_err(|err| ScratchError::dir(dir, err))?;
        let path = private.path().join(audio_file_name(title));
        Ok(Self {
            dir: private,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file and its directory now, logging failures.
    pub fn release(self) {
        let display = self.dir.path().display().to_string();
        if let Err(err) = self.dir.close() {
            tune_warn!("failed to remove scratch directory {}: {}", display, err);
        }
    }
}
