//! External graph-processor seam.
//!
//! [`Engine`] abstracts one blocking run of the SNAP graph processing tool
//! (`gpt`). [`GptEngine`] spawns the real executable and captures its exit
//! status and output; tests substitute in-process fakes. [`stage`] wraps an
//! engine run with the scratch-workspace and relocation contract.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::EngineConfig;

pub mod scratch;
pub mod stage;

pub use scratch::ScratchWorkspace;
pub use stage::{StageJob, StagedInvoker};

/// Fully resolved engine call:
/// `<gpt> <template> -PinFile=<product> -PoutFile=<out> -P<name>=<value>...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub program: PathBuf,
    pub template: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub parameters: Vec<(String, String)>,
}

impl EngineInvocation {
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![self.template.clone().into_os_string()];
        let mut in_file = OsString::from("-PinFile=");
        in_file.push(&self.input);
        args.push(in_file);
        let mut out_file = OsString::from("-PoutFile=");
        out_file.push(&self.output);
        args.push(out_file);
        for (name, value) in &self.parameters {
            args.push(OsString::from(format!("-P{name}={value}")));
        }
        args
    }

    /// Printable command line; the program is quoted so paths with spaces
    /// can be pasted into a shell
    pub fn command_line(&self) -> String {
        let mut line = format!("\"{}\"", self.program.display());
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Folder where the engine writes its band files (`<out>.data`)
    pub fn staged_data_dir(&self) -> PathBuf {
        self.output.with_extension("data")
    }
}

/// Exit status and captured output of one engine run
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessReport {
    /// Most informative one-line failure description
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        if !stderr.is_empty() {
            stderr.to_string()
        } else if !stdout.is_empty() {
            stdout.to_string()
        } else {
            match self.code {
                Some(c) => format!("exit status {c}"),
                None => "terminated by signal".to_string(),
            }
        }
    }
}

pub trait Engine {
    /// Path of the executable; checked for existence before any side effect
    fn executable(&self) -> &Path;

    /// Run the engine to completion (blocking, no timeout)
    fn execute(&self, invocation: &EngineInvocation) -> std::io::Result<ProcessReport>;
}

/// SNAP `gpt` run as a child process
#[derive(Debug, Clone)]
pub struct GptEngine {
    gpt: PathBuf,
}

impl GptEngine {
    pub fn new<P: Into<PathBuf>>(gpt: P) -> Self {
        Self { gpt: gpt.into() }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.gpt.clone())
    }
}

impl Engine for GptEngine {
    fn executable(&self) -> &Path {
        &self.gpt
    }

    fn execute(&self, invocation: &EngineInvocation) -> std::io::Result<ProcessReport> {
        debug!("spawning {}", invocation.command_line());
        let out = Command::new(&self.gpt).args(invocation.args()).output()?;
        Ok(ProcessReport {
            success: out.status.success(),
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}
