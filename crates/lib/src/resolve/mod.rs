//! Build root discovery.
//!
//! The build root is the `build-axon` directory. It is searched for in two
//! phases:
//! - upward: every ancestor of the start path, deepest first, is probed for a
//!   direct `build-axon` child
//! - downward: only when the upward phase fails, the start path and its
//!   subdirectories up to depth 2 are probed, nearest depth first
//!
//! Directories that cannot be listed because of access restrictions are
//! skipped and counted rather than aborting the search.

mod listing;

use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::BUILD_ROOT_DIR;

pub use listing::{DirListing, FsListing};

/// Which search phase located the build root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
  Upward,
  Downward,
}

/// A located build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub build_root: PathBuf,
  pub phase: SearchPhase,
  /// Directories the downward phase could not list.
  pub skipped: usize,
}

/// Outcome of the downward phase on its own.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownwardSearch {
  pub build_root: Option<PathBuf>,
  pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("'{}' not found searching from {}{}", BUILD_ROOT_DIR, start.display(), skipped_note(*skipped))]
  NotFound { start: PathBuf, skipped: usize },

  #[error("failed to determine current directory: {0}")]
  CurrentDir(#[source] io::Error),
}

fn skipped_note(skipped: usize) -> String {
  if skipped == 0 {
    String::new()
  } else {
    format!(" ({} unreadable director{} skipped)", skipped, if skipped == 1 { "y" } else { "ies" })
  }
}

/// Locate the build root from `start` on the real filesystem.
pub fn locate(start: &Path) -> Result<Resolution, ResolveError> {
  let start = absolutize(start)?;
  locate_with(&FsListing, &start)
}

/// Locate the build root from an absolute `start` through `listing`.
pub fn locate_with(listing: &dyn DirListing, start: &Path) -> Result<Resolution, ResolveError> {
  if let Some(build_root) = search_upward(listing, start) {
    info!(path = %build_root.display(), "build root found above start path");
    return Ok(Resolution {
      build_root,
      phase: SearchPhase::Upward,
      skipped: 0,
    });
  }

  let found = search_downward(listing, start);
  match found.build_root {
    Some(build_root) => {
      info!(path = %build_root.display(), skipped = found.skipped, "build root found below start path");
      Ok(Resolution {
        build_root,
        phase: SearchPhase::Downward,
        skipped: found.skipped,
      })
    }
    None => Err(ResolveError::NotFound {
      start: start.to_path_buf(),
      skipped: found.skipped,
    }),
  }
}

/// Probe `start` and each of its ancestors, deepest first, for a direct
/// build root child. The filesystem root is probed last.
pub fn search_upward(listing: &dyn DirListing, start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .map(|dir| dir.join(BUILD_ROOT_DIR))
    .find(|candidate| probe(listing, candidate))
}

/// Probe `start`, then its subdirectories at depth 1, then depth 2.
pub fn search_downward(listing: &dyn DirListing, start: &Path) -> DownwardSearch {
  let mut search = DownwardSearch::default();

  let direct = start.join(BUILD_ROOT_DIR);
  if probe(listing, &direct) {
    search.build_root = Some(direct);
    return search;
  }

  let depth1 = list_or_skip(listing, start, &mut search.skipped);
  search.build_root = first_candidate(listing, &depth1);
  if search.build_root.is_some() {
    return search;
  }

  for dir in &depth1 {
    let depth2 = list_or_skip(listing, dir, &mut search.skipped);
    search.build_root = first_candidate(listing, &depth2);
    if search.build_root.is_some() {
      return search;
    }
  }

  search
}

fn probe(listing: &dyn DirListing, candidate: &Path) -> bool {
  let hit = listing.is_dir(candidate);
  debug!(path = %candidate.display(), hit, "probing for build root");
  hit
}

fn first_candidate(listing: &dyn DirListing, dirs: &[PathBuf]) -> Option<PathBuf> {
  dirs
    .iter()
    .map(|dir| dir.join(BUILD_ROOT_DIR))
    .find(|candidate| probe(listing, candidate))
}

fn list_or_skip(listing: &dyn DirListing, dir: &Path, skipped: &mut usize) -> Vec<PathBuf> {
  match listing.list_dirs(dir) {
    Ok(dirs) => dirs,
    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
      debug!(path = %dir.display(), "permission denied, skipping directory");
      *skipped += 1;
      Vec::new()
    }
    Err(e) => {
      debug!(path = %dir.display(), error = %e, "cannot list directory");
      Vec::new()
    }
  }
}

/// Make `path` absolute against the current directory and fold `.` and `..`
/// lexically. Symlinks are not resolved.
pub fn absolutize(path: &Path) -> Result<PathBuf, ResolveError> {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir().map_err(ResolveError::CurrentDir)?.join(path)
  };

  let mut normalized = PathBuf::new();
  for component in dunce::simplified(&joined).components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  Ok(normalized)
}
