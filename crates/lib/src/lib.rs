//! fwstage-lib: build and stage MCU firmware.
//!
//! This crate provides the pipeline behind the `fwstage` binary:
//! - `resolve`: locate the `build-axon` build root around a start path
//! - `layout`: fixed paths derived from the build root
//! - `build`: run the external build tool in the MCU build directory
//! - `gate`: find the firmware image and check it is fresh
//! - `stage`: copy the image into the deployment layout
//! - `orchestrate`: sequence the above and map failures to exit codes

pub mod build;
pub mod config;
pub mod consts;
pub mod gate;
pub mod layout;
pub mod orchestrate;
pub mod resolve;
pub mod stage;
pub mod util;

pub use orchestrate::{RunError, RunOptions, RunReport, run};
