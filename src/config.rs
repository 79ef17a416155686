//! Harness configuration.
//!
//! The defaults reproduce the conventional layout: sources under `test/`,
//! the assembler run as `python3 assembler.py`, the VM as `./vm`. The CLI
//! overrides any of them.

use std::{path::PathBuf, process::Command};

use crate::errors::{HarnessError, HarnessResult};

pub const DEFAULT_ASSEMBLER: &str = "python3 assembler.py";
pub const DEFAULT_VM: &str = "./vm";
pub const DEFAULT_TEST_ROOT: &str = "test";

/// An external tool's command line: a program plus leading arguments.
///
/// Per-invocation arguments (source, artifact paths) are appended after these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits `line` on whitespace. No quoting is supported.
    pub fn parse(tool: &'static str, line: &str) -> HarnessResult<Self> {
        let cmd = Self::split(line);
        if cmd.program.is_empty() {
            return Err(HarnessError::EmptyCommand { tool });
        }
        Ok(cmd)
    }

    fn split(line: &str) -> Self {
        let mut words = line.split_whitespace().map(str::to_string);
        Self {
            program: words.next().unwrap_or_default(),
            args: words.collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A `Command` with the program and leading arguments already applied.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Configuration for a harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub assembler: ToolCommand,
    pub vm: ToolCommand,
    /// Directory builtin source cases are resolved under.
    pub test_root: PathBuf,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            assembler: ToolCommand::split(DEFAULT_ASSEMBLER),
            vm: ToolCommand::split(DEFAULT_VM),
            test_root: PathBuf::from(DEFAULT_TEST_ROOT),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}
