//! Fixed names of the build tree layout.

/// Directory searched for by the resolver. Its path is the build root.
pub const BUILD_ROOT_DIR: &str = "build-axon";

/// Platform release directory directly under the build root.
pub const LINUX_YP_DIR: &str = "linux_yp4.0_cgw_1.x.x_dev";

/// Deployment staging directory, nested under [`LINUX_YP_DIR`].
pub const STAGING_DIR: &str = "boot-firmware_tcn1000";

/// Segments from [`LINUX_YP_DIR`] down to the MCU build working directory.
pub const MCU_BUILD_SEGMENTS: &[&str] = &[
  "build",
  "tcn1000-mcu",
  "tmp",
  "work",
  "cortexm7-telechips-linux-musleabi",
  "m7-1",
  "1.0.0-r0",
  "git",
];

/// Boot firmware directory names produced by the MCU build, in priority order.
pub const BOOT_DIR_VARIANTS: &[&str] = &["boot-firmware-tcn100x", "boot-firmware_tcn100x"];

/// The staged firmware image.
pub const ARTIFACT_NAME: &str = "tcn100x_snor.rom";

/// Build tool run in the MCU build directory when no override is set.
pub const DEFAULT_BUILD_TOOL: &str = "make";

/// Default freshness window, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding [`DEFAULT_BUILD_TOOL`].
pub const BUILD_TOOL_ENV: &str = "FWSTAGE_BUILD_TOOL";
