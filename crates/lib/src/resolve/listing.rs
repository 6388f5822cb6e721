//! Directory listing capability used by the build root search.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of a directory tree.
pub trait DirListing {
  /// Whether `path` exists and is a directory (symlinks are followed).
  fn is_dir(&self, path: &Path) -> bool;

  /// Immediate subdirectories of `path`, sorted by name.
  fn list_dirs(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// [`DirListing`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl DirListing for FsListing {
  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn list_dirs(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
    // Entries that fail to read are dropped; the rest of the listing stands.
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)?
      .filter_map(Result::ok)
      .map(|entry| entry.path())
      .filter(|path| path.is_dir())
      .collect();
    dirs.sort();
    Ok(dirs)
  }
}
