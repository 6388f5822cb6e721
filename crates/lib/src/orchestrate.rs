//! Build-and-stage pipeline.
//!
//! One invocation walks the phases in order and stops at the first failure:
//!
//! 1. Resolve the build root
//! 2. Compute the layout (dry run stops here)
//! 3. Check the MCU build directory and enter it
//! 4. Run the build tool
//! 5. Gate the artifact
//! 6. Stage the artifact
//!
//! Nothing is retried. Every failure maps to one exit code through
//! [`RunError::exit_code`].

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::build::{BuildError, BuildTool, TOOL_NOT_EXECUTABLE_STATUS, TOOL_NOT_FOUND_STATUS};
use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::gate::{self, ArtifactRecord, GateError, GateOptions};
use crate::layout::LayoutPaths;
use crate::resolve::{self, ResolveError, SearchPhase};
use crate::stage::{self, StageError, StageReport};

/// Process exit codes, one per failure class.
pub mod exit_code {
  pub const SUCCESS: i32 = 0;
  pub const BUILD_ROOT_NOT_FOUND: i32 = 4;
  pub const MCU_BUILD_DIR_MISSING: i32 = 5;
  pub const CHANGE_DIR_FAILED: i32 = 6;
  pub const BOOT_DIR_NOT_FOUND: i32 = 7;
  pub const ARTIFACT_NOT_FOUND: i32 = 8;
  pub const ARTIFACT_STALE: i32 = 9;
  pub const COPY_FAILED: i32 = 10;
}

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Resolving,
  ComputingLayout,
  DryRunReport,
  EnteringBuildDir,
  Building,
  Gating,
  Staging,
  Done,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Phase::Resolving => "resolving",
      Phase::ComputingLayout => "computing layout",
      Phase::DryRunReport => "dry run report",
      Phase::EnteringBuildDir => "entering build dir",
      Phase::Building => "building",
      Phase::Gating => "gating",
      Phase::Staging => "staging",
      Phase::Done => "done",
    };
    f.write_str(name)
  }
}

/// Options for [`run`].
#[derive(Debug, Clone)]
pub struct RunOptions {
  /// Where the build root search starts.
  pub start: PathBuf,
  /// Stop after computing the layout.
  pub dry_run: bool,
  /// Maximum artifact age.
  pub timeout: Duration,
  /// Skip the artifact freshness check.
  pub force_copy: bool,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      start: PathBuf::from("."),
      dry_run: false,
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      force_copy: false,
    }
  }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
  pub build_root: PathBuf,
  pub search_phase: SearchPhase,
  /// Directories the search could not list.
  pub skipped_dirs: usize,
  pub layout: LayoutPaths,
  pub dry_run: bool,
  /// Present once the build ran.
  pub build_duration: Option<Duration>,
  /// Present once the artifact passed the gate.
  pub artifact: Option<ArtifactRecord>,
  /// Present once the artifact was staged.
  pub staged: Option<StageReport>,
}

#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("computed MCU build path does not exist: {}", path.display())]
  McuBuildDirMissing { path: PathBuf },

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error("build tool exited with status {status}")]
  BuildFailed { status: i32 },

  #[error(transparent)]
  Gate(#[from] GateError),

  #[error(transparent)]
  Stage(#[from] StageError),
}

impl RunError {
  /// The process exit code for this failure.
  pub fn exit_code(&self) -> i32 {
    match self {
      RunError::Resolve(_) => exit_code::BUILD_ROOT_NOT_FOUND,
      RunError::McuBuildDirMissing { .. } => exit_code::MCU_BUILD_DIR_MISSING,
      RunError::Build(BuildError::ChangeDir { .. }) => exit_code::CHANGE_DIR_FAILED,
      RunError::Build(BuildError::ToolNotFound { .. }) => TOOL_NOT_FOUND_STATUS,
      RunError::Build(BuildError::Launch { .. }) => TOOL_NOT_EXECUTABLE_STATUS,
      RunError::BuildFailed { status } => *status,
      RunError::Gate(GateError::BootDirNotFound { .. }) => exit_code::BOOT_DIR_NOT_FOUND,
      RunError::Gate(GateError::ArtifactNotFound { .. } | GateError::Metadata { .. }) => {
        exit_code::ARTIFACT_NOT_FOUND
      }
      RunError::Gate(GateError::ArtifactStale { .. }) => exit_code::ARTIFACT_STALE,
      RunError::Stage(_) => exit_code::COPY_FAILED,
    }
  }

  /// The phase that failed.
  pub fn phase(&self) -> Phase {
    match self {
      RunError::Resolve(_) => Phase::Resolving,
      RunError::McuBuildDirMissing { .. } | RunError::Build(BuildError::ChangeDir { .. }) => Phase::EnteringBuildDir,
      RunError::Build(_) | RunError::BuildFailed { .. } => Phase::Building,
      RunError::Gate(_) => Phase::Gating,
      RunError::Stage(_) => Phase::Staging,
    }
  }
}

/// Run the pipeline once with `tool` as the build tool.
pub fn run(options: &RunOptions, tool: &dyn BuildTool) -> Result<RunReport, RunError> {
  enter(Phase::Resolving);
  let resolution = resolve::locate(&options.start)?;

  enter(Phase::ComputingLayout);
  let layout = LayoutPaths::new(&resolution.build_root);
  let mut report = RunReport {
    build_root: resolution.build_root,
    search_phase: resolution.phase,
    skipped_dirs: resolution.skipped,
    layout,
    dry_run: options.dry_run,
    build_duration: None,
    artifact: None,
    staged: None,
  };

  if options.dry_run {
    enter(Phase::DryRunReport);
    info!(build_root = %report.build_root.display(), "dry run, nothing executed");
    return Ok(report);
  }

  enter(Phase::EnteringBuildDir);
  let mcu_build_dir = &report.layout.mcu_build_dir;
  if !mcu_build_dir.is_dir() {
    return Err(RunError::McuBuildDirMissing {
      path: mcu_build_dir.clone(),
    });
  }

  enter(Phase::Building);
  let started = Instant::now();
  let status = tool.run(mcu_build_dir)?;
  report.build_duration = Some(started.elapsed());
  if status != 0 {
    return Err(RunError::BuildFailed { status });
  }

  enter(Phase::Gating);
  let gate_options = GateOptions {
    timeout: options.timeout,
    force: options.force_copy,
  };
  let artifact = gate::validate(mcu_build_dir, &gate_options)?;

  enter(Phase::Staging);
  let staged = stage::stage(&artifact.path, &report.layout.destination, false)?;
  report.artifact = Some(artifact);
  report.staged = Some(staged);

  enter(Phase::Done);
  Ok(report)
}

fn enter(phase: Phase) {
  debug!(%phase, "entering phase");
}
