//! Copy of a validated artifact into the staging layout.

use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StageError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  CopyFailed { from: PathBuf, to: PathBuf, source: io::Error },
}

/// What [`stage`] did, or would have done in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
  pub source: PathBuf,
  pub destination: PathBuf,
  pub dry_run: bool,
  pub bytes: u64,
}

/// Copy `artifact` to `destination`, creating missing parent directories and
/// overwriting any file already there. Modification and access times are
/// carried over. In dry-run mode nothing is touched.
pub fn stage(artifact: &Path, destination: &Path, dry_run: bool) -> Result<StageReport, StageError> {
  if dry_run {
    info!(from = %artifact.display(), to = %destination.display(), "would copy artifact");
    return Ok(StageReport {
      source: artifact.to_path_buf(),
      destination: destination.to_path_buf(),
      dry_run,
      bytes: 0,
    });
  }

  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent).map_err(|source| StageError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  let bytes = copy_preserving_times(artifact, destination).map_err(|source| StageError::CopyFailed {
    from: artifact.to_path_buf(),
    to: destination.to_path_buf(),
    source,
  })?;

  info!(to = %destination.display(), bytes, "artifact staged");
  Ok(StageReport {
    source: artifact.to_path_buf(),
    destination: destination.to_path_buf(),
    dry_run,
    bytes,
  })
}

fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<u64> {
  let bytes = fs::copy(from, to)?;

  let metadata = fs::metadata(from)?;
  let mut times = FileTimes::new().set_modified(metadata.modified()?);
  if let Ok(accessed) = metadata.accessed() {
    times = times.set_accessed(accessed);
  }
  // The copy keeps the source mode, which may be read-only.
  let file = if cfg!(windows) {
    fs::File::options().write(true).open(to)?
  } else {
    fs::File::open(to)?
  };
  file.set_times(times)?;

  Ok(bytes)
}
