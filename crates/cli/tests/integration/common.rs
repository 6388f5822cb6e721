//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const ROM_NAME: &str = "tcn100x_snor.rom";

/// Isolated project tree.
///
/// Lays out `<temp>/a/b/build-axon` with the MCU build directory in place.
pub struct TestEnv {
  pub temp: TempDir,
  pub build_root: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let base = dunce::canonicalize(temp.path()).unwrap();
    let build_root = base.join("a").join("b").join("build-axon");
    let env = Self { temp, build_root };
    fs::create_dir_all(env.mcu_build_dir()).unwrap();
    env
  }

  /// A temp directory with no build root anywhere in reach.
  pub fn without_build_root() -> Self {
    let temp = TempDir::new().unwrap();
    let base = dunce::canonicalize(temp.path()).unwrap();
    Self {
      temp,
      build_root: base.join("missing").join("build-axon"),
    }
  }

  pub fn base(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn mcu_build_dir(&self) -> PathBuf {
    self
      .build_root
      .join("linux_yp4.0_cgw_1.x.x_dev")
      .join("build")
      .join("tcn1000-mcu")
      .join("tmp")
      .join("work")
      .join("cortexm7-telechips-linux-musleabi")
      .join("m7-1")
      .join("1.0.0-r0")
      .join("git")
  }

  pub fn staging_dir(&self) -> PathBuf {
    self
      .build_root
      .join("linux_yp4.0_cgw_1.x.x_dev")
      .join("boot-firmware_tcn1000")
  }

  pub fn destination(&self) -> PathBuf {
    self.staging_dir().join(ROM_NAME)
  }

  /// Writes the ROM image into the preferred boot firmware directory.
  pub fn write_rom(&self, content: &[u8], age: Duration) -> PathBuf {
    let dir = self.mcu_build_dir().join("boot-firmware-tcn100x");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(ROM_NAME);
    fs::write(&path, content).unwrap();
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
    path
  }

  /// Writes an executable build tool script outside the project tree.
  #[cfg(unix)]
  pub fn build_tool(&self, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.base().join("fake-make.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// Get a Command for the fwstage binary using `tool` as the build tool.
  pub fn fwstage_cmd(&self, tool: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("fwstage");
    cmd.env("FWSTAGE_BUILD_TOOL", tool);
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

/// Count every file and directory below `dir`.
pub fn tree_size(dir: &Path) -> usize {
  fs::read_dir(dir)
    .unwrap()
    .map(|entry| {
      let path = entry.unwrap().path();
      if path.is_dir() { 1 + tree_size(&path) } else { 1 }
    })
    .sum()
}
