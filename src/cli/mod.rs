//! Command Line Interface (CLI) layer for s1feat.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the per-artifact subcommands
//! and the batch driver. It wires user-provided options to the library
//! functionality exposed via `s1feat::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
