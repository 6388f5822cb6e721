//! Runtime configuration read from the environment.

use std::ffi::OsString;

use crate::consts::{BUILD_TOOL_ENV, DEFAULT_BUILD_TOOL};

/// Returns the program invoked as the build tool.
///
/// `FWSTAGE_BUILD_TOOL` takes precedence when set and non-empty, otherwise
/// `make` is looked up on `PATH`.
pub fn build_tool_program() -> OsString {
  match std::env::var_os(BUILD_TOOL_ENV) {
    Some(program) if !program.is_empty() => program,
    _ => OsString::from(DEFAULT_BUILD_TOOL),
  }
}
