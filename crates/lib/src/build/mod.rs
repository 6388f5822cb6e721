//! Invocation of the external build tool.
//!
//! The tool runs as a blocking child process with no arguments, inside the
//! MCU build working directory. Its exit status is returned as-is; deciding
//! what a non-zero status means is left to the caller.
//!
//! The tool's stdout is redirected to stderr so that stdout carries only the
//! report rendered by the caller.

mod workdir;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::build_tool_program;

pub use workdir::WorkdirGuard;

/// Status reported when the build tool cannot be found.
pub const TOOL_NOT_FOUND_STATUS: i32 = 127;

/// Status reported when the build tool exists but cannot be launched.
pub const TOOL_NOT_EXECUTABLE_STATUS: i32 = 126;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to change directory to {}: {source}", path.display())]
  ChangeDir { path: PathBuf, source: io::Error },

  #[error("'{}' not found on PATH", program.to_string_lossy())]
  ToolNotFound { program: OsString },

  #[error("failed to launch '{}': {source}", program.to_string_lossy())]
  Launch { program: OsString, source: io::Error },
}

/// Something that can run a build in a working directory.
pub trait BuildTool {
  /// Runs the build in `working_dir` and returns its exit status.
  fn run(&self, working_dir: &Path) -> Result<i32, BuildError>;
}

/// Runs an external program, `make` by default.
#[derive(Debug, Clone)]
pub struct CommandTool {
  program: OsString,
}

impl CommandTool {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self { program: program.into() }
  }

  /// Uses `FWSTAGE_BUILD_TOOL` when set, `make` otherwise.
  pub fn from_env() -> Self {
    Self::new(build_tool_program())
  }
}

impl BuildTool for CommandTool {
  fn run(&self, working_dir: &Path) -> Result<i32, BuildError> {
    let _guard = WorkdirGuard::enter(working_dir).map_err(|source| BuildError::ChangeDir {
      path: working_dir.to_path_buf(),
      source,
    })?;

    info!(program = %self.program.to_string_lossy(), dir = %working_dir.display(), "running build tool");

    let status = Command::new(&self.program)
      .stdout(Stdio::from(io::stderr()))
      .status()
      .map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
          BuildError::ToolNotFound {
            program: self.program.clone(),
          }
        } else {
          BuildError::Launch {
            program: self.program.clone(),
            source,
          }
        }
      })?;

    let code = status_code(status);
    debug!(status = code, "build tool exited");
    Ok(code)
  }
}

/// Exit code of a finished child. Signal termination follows the shell
/// convention of `128 + signal`.
fn status_code(status: ExitStatus) -> i32 {
  if let Some(code) = status.code() {
    return code;
  }

  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return 128 + signal;
    }
  }

  1
}
