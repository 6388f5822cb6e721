//! Test utilities for fwstage-lib.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Writes an executable `/bin/sh` script and returns its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Creates `path` (and its parents) with `content`, modified `age` ago.
pub fn write_aged_file(path: &Path, content: &[u8], age: Duration) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
  set_age(path, age);
}

/// Sets the modification time of `path` to `age` before now.
pub fn set_age(path: &Path, age: Duration) {
  let mtime = SystemTime::now() - age;
  let file = fs::File::options().write(true).open(path).unwrap();
  file.set_modified(mtime).unwrap();
}
