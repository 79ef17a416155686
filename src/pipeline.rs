//! Per-case driver: assemble, execute, parse, compare, clean up.
//!
//! Each case moves through
//!
//! ```text
//! Pending -> [Assembling -> Assembled | AssemblyFailed]
//!         -> Executing -> [Parsed | ParseFailed | RuntimeFailed]
//!         -> Compared -> Done
//! ```
//!
//! Assembly only happens for source cases. Whatever the outcome, the
//! generated artifact is removed before the next case starts.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use log::{debug, trace, warn};
use termcolor::WriteColor;

use crate::{
    catalog::{Catalog, TestCase},
    config::{HarnessConfig, ToolCommand},
    errors::HarnessResult,
    outcome::{ExecutionOutcome, Summary},
    parse::parse_top_of_stack,
    report::Reporter,
};

// ============================================================================
// TOOLCHAIN - The external assembler and VM
// ============================================================================

/// What an external tool invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRun {
    pub success: bool,
    /// Standard output and standard error, interleaved as written.
    pub output: String,
}

impl ToolRun {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    fn from_merged(bytes: &[u8], status: ExitStatus) -> Self {
        let mut text = String::from_utf8_lossy(bytes).into_owned();
        // Killed by a signal: there is no exit code and often no output.
        if status.code().is_none() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&format!("terminated: {}", status));
        }
        Self {
            success: status.success(),
            output: text,
        }
    }
}

/// Runs `command` with stdout and stderr sharing one pipe and waits for it.
fn run_merged(mut command: Command) -> io::Result<ToolRun> {
    let (mut reader, writer) = os_pipe::pipe()?;
    command.stdout(writer.try_clone()?).stderr(writer);
    let mut child = command.spawn()?;
    // The command still holds the write ends; the read below only sees EOF
    // once they are closed.
    drop(command);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let status = child.wait()?;
    Ok(ToolRun::from_merged(&bytes, status))
}

/// The external assembler/VM pair under test.
///
/// An `Err` means the tool could not be started at all.
pub trait Toolchain {
    /// Runs `assembler <source> <artifact>`.
    fn assemble(&self, source: &Path, artifact: &Path) -> io::Result<ToolRun>;
    /// Runs `vm <artifact>`.
    fn execute(&self, artifact: &Path) -> io::Result<ToolRun>;
}

/// Runs the toolchain as child processes, blocking until each exits.
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    assembler: ToolCommand,
    vm: ToolCommand,
}

impl ProcessToolchain {
    pub fn new(assembler: ToolCommand, vm: ToolCommand) -> Self {
        Self { assembler, vm }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.assembler.clone(), config.vm.clone())
    }
}

impl Toolchain for ProcessToolchain {
    fn assemble(&self, source: &Path, artifact: &Path) -> io::Result<ToolRun> {
        trace!("spawning `{} {} {}`", self.assembler, source.display(), artifact.display());
        let mut command = self.assembler.command();
        command.arg(source).arg(artifact);
        run_merged(command)
    }

    fn execute(&self, artifact: &Path) -> io::Result<ToolRun> {
        trace!("spawning `{} {}`", self.vm, artifact.display());
        let mut command = self.vm.command();
        command.arg(artifact);
        run_merged(command)
    }
}

// ============================================================================
// ARTIFACT CLEANUP
// ============================================================================

/// Removes a generated artifact when dropped.
///
/// Armed before the assembler runs, so a partially written artifact from a
/// failed assembly is removed too.
#[derive(Debug)]
pub struct ArtifactGuard {
    path: PathBuf,
}

impl ArtifactGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed artifact {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove artifact {}: {}", self.path.display(), e),
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Drives test cases through a [`Toolchain`] one at a time.
pub struct Pipeline<T: Toolchain> {
    toolchain: T,
}

impl<T: Toolchain> Pipeline<T> {
    pub fn new(toolchain: T) -> Self {
        Self { toolchain }
    }

    #[cfg(test)]
    fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Runs every case in order, reporting each outcome as soon as it exists.
    pub fn run<W: WriteColor>(
        &self,
        catalog: &Catalog,
        reporter: &mut Reporter<W>,
    ) -> HarnessResult<Summary> {
        reporter.header()?;
        for case in catalog {
            let outcome = self.run_case(case);
            reporter.record(case, &outcome)?;
        }
        reporter.finish()
    }

    /// Drives one case to exactly one outcome.
    pub fn run_case(&self, case: &TestCase) -> ExecutionOutcome {
        debug!("{}: starting", case.name());
        let (artifact, _guard) = match case.generated_artifact_path() {
            Some(generated) => {
                let guard = ArtifactGuard::new(&generated);
                if let Err(outcome) = self.assemble(case, &generated) {
                    return outcome;
                }
                (generated, Some(guard))
            }
            None => (case.path().to_path_buf(), None),
        };
        let outcome = self.execute(case, &artifact);
        debug!("{}: {:?}", case.name(), outcome);
        outcome
    }

    fn assemble(&self, case: &TestCase, artifact: &Path) -> Result<(), ExecutionOutcome> {
        debug!("{}: assembling into {}", case.name(), artifact.display());
        match self.toolchain.assemble(case.path(), artifact) {
            Ok(run) if run.success => Ok(()),
            Ok(run) => {
                debug!("{}: assembler failed", case.name());
                Err(ExecutionOutcome::AssemblyFailed {
                    diagnostics: run.output,
                })
            }
            Err(e) => {
                warn!("{}: could not start assembler: {}", case.name(), e);
                Err(ExecutionOutcome::AssemblyFailed {
                    diagnostics: format!("failed to start assembler: {}", e),
                })
            }
        }
    }

    fn execute(&self, case: &TestCase, artifact: &Path) -> ExecutionOutcome {
        debug!("{}: executing {}", case.name(), artifact.display());
        let run = match self.toolchain.execute(artifact) {
            Ok(run) => run,
            Err(e) => {
                warn!("{}: could not start vm: {}", case.name(), e);
                return ExecutionOutcome::RuntimeFailed {
                    output: format!("failed to start vm: {}", e),
                };
            }
        };
        if !run.success {
            return ExecutionOutcome::RuntimeFailed { output: run.output };
        }
        match parse_top_of_stack(&run.output) {
            Ok(actual) => compare(actual, case.expected()),
            Err(e) => {
                debug!("{}: {}", case.name(), e);
                ExecutionOutcome::ParseFailed { output: run.output }
            }
        }
    }
}

/// The comparison stage.
pub fn compare(actual: i64, expected: i64) -> ExecutionOutcome {
    if actual == expected {
        ExecutionOutcome::Passed { actual }
    } else {
        ExecutionOutcome::ValueMismatch { actual, expected }
    }
}
