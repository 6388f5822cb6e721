//! Implementation of the default `fwstage` command.
//!
//! Locates the build root, runs the build tool in the MCU build directory and
//! stages the resulting ROM image. Failures are rendered here and turned into
//! the process exit code.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::error;

use fwstage_lib::build::CommandTool;
use fwstage_lib::consts::{ARTIFACT_NAME, BUILD_ROOT_DIR};
use fwstage_lib::layout::LayoutPaths;
use fwstage_lib::orchestrate::exit_code;
use fwstage_lib::resolve::SearchPhase;
use fwstage_lib::{RunError, RunOptions, RunReport, run};

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_error, print_info, print_json, print_stat, print_success,
  print_warning, symbols,
};

#[derive(Debug, Serialize)]
struct RunOutput<'a> {
  build_root: &'a Path,
  search_phase: SearchPhase,
  skipped_dirs: usize,
  #[serde(flatten)]
  layout: &'a LayoutPaths,
  dry_run: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  build_duration_ms: Option<u128>,
  #[serde(skip_serializing_if = "Option::is_none")]
  artifact: Option<ArtifactOutput<'a>>,
}

#[derive(Debug, Serialize)]
struct ArtifactOutput<'a> {
  source: &'a Path,
  age_secs: f64,
  bytes: u64,
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
  error: String,
  phase: String,
  exit_code: i32,
}

/// Execute the pipeline and return the process exit code.
pub fn cmd_run(options: &RunOptions, output: OutputFormat) -> i32 {
  let tool = CommandTool::from_env();

  match run(options, &tool) {
    Ok(report) => match render_report(&report, output) {
      Ok(()) => exit_code::SUCCESS,
      Err(e) => {
        // The run itself succeeded; only rendering failed.
        error!(error = %e, "failed to render report");
        exit_code::SUCCESS
      }
    },
    Err(err) => {
      let code = err.exit_code();
      render_error(&err, code, output);
      code
    }
  }
}

fn render_report(report: &RunReport, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    let artifact = match (&report.artifact, &report.staged) {
      (Some(artifact), Some(staged)) => Some(ArtifactOutput {
        source: &artifact.path,
        age_secs: artifact.age.as_secs_f64(),
        bytes: staged.bytes,
      }),
      _ => None,
    };
    return print_json(&RunOutput {
      build_root: &report.build_root,
      search_phase: report.search_phase,
      skipped_dirs: report.skipped_dirs,
      layout: &report.layout,
      dry_run: report.dry_run,
      build_duration_ms: report.build_duration.map(|d| d.as_millis()),
      artifact,
    });
  }

  if report.skipped_dirs > 0 {
    print_warning(&format!(
      "{} director{} could not be searched (permission denied)",
      report.skipped_dirs,
      if report.skipped_dirs == 1 { "y" } else { "ies" }
    ));
  }

  if report.dry_run {
    print_info(&format!("{} found at: {}", BUILD_ROOT_DIR, report.build_root.display()));
    print_info(&format!(
      "Computed MCU build path: {}",
      report.layout.mcu_build_dir.display()
    ));
    print_info(&format!(
      "ROM copy destination dir: {}",
      report.layout.staging_dir.display()
    ));
    print_stat("Destination", &report.layout.destination.display().to_string());
    return Ok(());
  }

  print_success(&format!(
    "Successfully copied {} to {}",
    ARTIFACT_NAME,
    report.layout.destination.display()
  ));
  if let (Some(artifact), Some(staged)) = (&report.artifact, &report.staged) {
    print_stat(
      "Source",
      &format!("{} {} {}", artifact.path.display(), symbols::ARROW, staged.destination.display()),
    );
    print_stat("Size", &format_bytes(staged.bytes));
    print_stat("Age", &format_duration(artifact.age));
  }
  if let Some(duration) = report.build_duration {
    print_stat("Build", &format_duration(duration));
  }

  Ok(())
}

fn render_error(err: &RunError, code: i32, output: OutputFormat) {
  print_error(&format!("Error: {}", err));

  if output.is_json() {
    let result = print_json(&ErrorOutput {
      error: err.to_string(),
      phase: err.phase().to_string(),
      exit_code: code,
    });
    if let Err(e) = result {
      error!(error = %e, "failed to render error");
    }
  }
}
