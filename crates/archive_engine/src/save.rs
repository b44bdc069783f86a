use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::MAX_FILENAME_LEN;

const MAX_NUMBERED_COPIES: usize = 999;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("refusing to save under {0:?}: not a plain file name")]
    InvalidName(String),
    #[error("no free numbered name left for {0:?}")]
    NameTaken(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SaveError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| SaveError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(SaveError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SaveError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Host capability that stores a downloaded payload under a file name.
pub trait FileSaver: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SaveError>;
}

/// Saves into one directory by writing a temp file then renaming it over
/// `{dir}/{filename}`.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    /// Never replaces an existing file: a taken name is saved as
    /// `stem (1).ext`, `stem (2).ext` and so on. Returns the path written.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\'])
        {
            return Err(SaveError::InvalidName(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        for copy in 0..=MAX_NUMBERED_COPIES {
            let target = self.dir.join(numbered_name(filename, copy));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(SaveError::Io(err.error)),
            }
        }
        Err(SaveError::NameTaken(filename.to_string()))
    }
}

/// `filename` for copy 0, otherwise `stem (n).ext` with the stem shortened
/// so the whole name stays within [`MAX_FILENAME_LEN`] characters.
fn numbered_name(filename: &str, copy: usize) -> String {
    if copy == 0 {
        return filename.to_string();
    }
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (filename, None),
    };
    let suffix = format!(" ({copy})");
    let reserved = suffix.chars().count() + extension.map_or(0, |e| e.chars().count() + 1);
    let budget = MAX_FILENAME_LEN.saturating_sub(reserved).max(1);
    let stem: String = stem.chars().take(budget).collect();
    match extension {
        Some(extension) => format!("{stem}{suffix}.{extension}"),
        None => format!("{stem}{suffix}"),
    }
}
