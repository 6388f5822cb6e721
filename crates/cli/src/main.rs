mod cmd;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwstage_lib::RunOptions;

use crate::output::OutputFormat;

/// fwstage - build MCU firmware and stage the ROM image
///
/// Finds the build-axon directory around PATH, runs the build tool in the MCU
/// build directory and copies the fresh ROM image into the deployment layout.
#[derive(Parser)]
#[command(name = "fwstage")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Starting path to search for the build-axon folder
  #[arg(default_value = ".")]
  path: PathBuf,

  /// Show the computed paths without running the build or copying
  #[arg(long)]
  dry_run: bool,

  /// Allowed age of the ROM image, in seconds or as a duration ("90s", "2m")
  #[arg(long, value_name = "SECONDS", default_value = "60", value_parser = parse_timeout)]
  timeout: Duration,

  /// Bypass the age check and copy the ROM image anyway
  #[arg(long)]
  force_copy: bool,

  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  output: OutputFormat,
}

/// Plain integers are seconds; anything else goes through humantime.
fn parse_timeout(value: &str) -> Result<Duration, String> {
  if let Ok(secs) = value.parse::<u64>() {
    return Ok(Duration::from_secs(secs));
  }
  humantime::parse_duration(value).map_err(|e| e.to_string())
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let options = RunOptions {
    start: cli.path,
    dry_run: cli.dry_run,
    timeout: cli.timeout,
    force_copy: cli.force_copy,
  };

  let code = cmd::cmd_run(&options, cli.output);
  std::process::exit(code);
}
