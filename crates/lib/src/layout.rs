//! Fixed paths derived from the build root.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{ARTIFACT_NAME, LINUX_YP_DIR, MCU_BUILD_SEGMENTS, STAGING_DIR};

/// Paths computed from a build root. Pure function of the build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPaths {
  /// Working directory of the MCU build.
  pub mcu_build_dir: PathBuf,
  /// Deployment staging directory.
  pub staging_dir: PathBuf,
  /// Where the artifact lands inside `staging_dir`.
  pub destination: PathBuf,
}

impl LayoutPaths {
  pub fn new(build_root: &Path) -> Self {
    let linux_yp = build_root.join(LINUX_YP_DIR);
    let mcu_build_dir = MCU_BUILD_SEGMENTS
      .iter()
      .fold(linux_yp.clone(), |dir, segment| dir.join(segment));
    let staging_dir = linux_yp.join(STAGING_DIR);
    let destination = staging_dir.join(ARTIFACT_NAME);

    Self {
      mcu_build_dir,
      staging_dir,
      destination,
    }
  }
}
