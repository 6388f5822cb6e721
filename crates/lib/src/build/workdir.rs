//! Scoped change of the process working directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Holds the process inside a working directory until dropped, then returns
/// to the directory that was current before [`WorkdirGuard::enter`].
///
/// The working directory is process-wide state: only one guard may be live
/// at a time and it must not be shared across threads.
#[derive(Debug)]
pub struct WorkdirGuard {
  previous: Option<PathBuf>,
}

impl WorkdirGuard {
  pub fn enter(dir: &Path) -> io::Result<Self> {
    let previous = std::env::current_dir().ok();
    std::env::set_current_dir(dir)?;
    debug!(path = %dir.display(), "entered working directory");
    Ok(Self { previous })
  }
}

impl Drop for WorkdirGuard {
  fn drop(&mut self) {
    let Some(previous) = self.previous.take() else {
      return;
    };
    if let Err(e) = std::env::set_current_dir(&previous) {
      warn!(path = %previous.display(), error = %e, "failed to restore working directory");
    }
  }
}
