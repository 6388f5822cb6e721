//! Dry-run integration tests.

use std::fs;

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, tree_size};

#[test]
#[serial]
fn dry_run_prints_paths_and_runs_nothing() {
  let env = TestEnv::new();
  let marker = env.base().join("tool_ran");
  let tool = env.build_tool(&format!("touch '{}'", marker.display()));
  let before = tree_size(&env.base());

  env
    .fwstage_cmd(&tool)
    .arg(env.base())
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains(env.build_root.display().to_string()))
    .stdout(predicate::str::contains(env.mcu_build_dir().display().to_string()))
    .stdout(predicate::str::contains(env.staging_dir().display().to_string()));

  assert!(!marker.exists());
  assert_eq!(tree_size(&env.base()), before);
}

#[test]
#[serial]
fn dry_run_succeeds_without_mcu_build_dir() {
  let env = TestEnv::new();
  fs::remove_dir_all(env.build_root.join("linux_yp4.0_cgw_1.x.x_dev")).unwrap();
  let tool = env.build_tool("exit 1");

  env
    .fwstage_cmd(&tool)
    .arg(env.base())
    .arg("--dry-run")
    .assert()
    .code(0);

  assert_eq!(fs::read_dir(&env.build_root).unwrap().count(), 0);
}

#[test]
#[serial]
fn dry_run_still_fails_when_build_root_missing() {
  let env = TestEnv::without_build_root();
  let tool = env.build_tool("exit 0");

  env
    .fwstage_cmd(&tool)
    .arg(env.base())
    .arg("--dry-run")
    .assert()
    .code(4);
}

#[test]
#[serial]
fn dry_run_json_lists_layout() {
  let env = TestEnv::new();
  let tool = env.build_tool("exit 0");

  let output = env
    .fwstage_cmd(&tool)
    .arg(env.build_root.parent().unwrap())
    .args(["--dry-run", "-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(report["dry_run"], true);
  assert_eq!(report["search_phase"], "upward");
  assert_eq!(report["mcu_build_dir"], env.mcu_build_dir().display().to_string());
  assert_eq!(report["staging_dir"], env.staging_dir().display().to_string());
  assert!(report.get("artifact").is_none());
}
