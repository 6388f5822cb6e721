//! Artifact discovery and freshness validation.
//!
//! A build tool exiting with status 0 does not prove the artifact was
//! rewritten (an up-to-date build is a no-op), so the artifact's
//! modification time is compared against the clock as well.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{ARTIFACT_NAME, BOOT_DIR_VARIANTS};

#[derive(Debug, Error)]
pub enum GateError {
  #[error("boot firmware directory not found in {}", dir.display())]
  BootDirNotFound { dir: PathBuf },

  #[error("{} not found in {}", ARTIFACT_NAME, boot_dir.display())]
  ArtifactNotFound { boot_dir: PathBuf },

  #[error("{} is too old ({:.1}s > {}s)", ARTIFACT_NAME, age.as_secs_f64(), timeout.as_secs())]
  ArtifactStale { path: PathBuf, age: Duration, timeout: Duration },

  #[error("failed to read modification time of {}: {source}", path.display())]
  Metadata { path: PathBuf, source: io::Error },
}

/// Freshness settings for [`validate`].
#[derive(Debug, Clone, Copy)]
pub struct GateOptions {
  /// Maximum allowed artifact age.
  pub timeout: Duration,
  /// Skip the freshness check.
  pub force: bool,
}

/// A located artifact that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
  pub path: PathBuf,
  pub boot_dir: PathBuf,
  pub modified: SystemTime,
  /// Age at validation time; zero when the timestamp lies in the future.
  pub age: Duration,
}

/// Returns the first accepted boot firmware directory under `mcu_build_dir`.
pub fn find_boot_dir(mcu_build_dir: &Path) -> Option<PathBuf> {
  BOOT_DIR_VARIANTS
    .iter()
    .map(|name| mcu_build_dir.join(name))
    .find(|candidate| candidate.is_dir())
}

/// Validate the artifact against the current time.
pub fn validate(mcu_build_dir: &Path, options: &GateOptions) -> Result<ArtifactRecord, GateError> {
  validate_at(mcu_build_dir, options, SystemTime::now())
}

/// Validate the artifact against `now`.
pub fn validate_at(mcu_build_dir: &Path, options: &GateOptions, now: SystemTime) -> Result<ArtifactRecord, GateError> {
  let boot_dir = find_boot_dir(mcu_build_dir).ok_or_else(|| GateError::BootDirNotFound {
    dir: mcu_build_dir.to_path_buf(),
  })?;
  debug!(path = %boot_dir.display(), "using boot firmware directory");

  let path = boot_dir.join(ARTIFACT_NAME);
  if !path.is_file() {
    return Err(GateError::ArtifactNotFound { boot_dir });
  }

  let modified = path
    .metadata()
    .and_then(|m| m.modified())
    .map_err(|source| GateError::Metadata {
      path: path.clone(),
      source,
    })?;
  let age = now.duration_since(modified).unwrap_or(Duration::ZERO);

  if options.force {
    info!(path = %path.display(), age_secs = age.as_secs_f64(), "freshness check bypassed");
  } else if age > options.timeout {
    return Err(GateError::ArtifactStale {
      path,
      age,
      timeout: options.timeout,
    });
  }

  Ok(ArtifactRecord {
    path,
    boot_dir,
    modified,
    age,
  })
}
