//! Console report: one fixed-width row per case plus a closing summary.
//!
//! ```text
//! Test File            | Expected   | Actual     | Status
//! -----------------------------------------------------------------
//! test_push.asm        | 10         | 10         | PASS
//! test_pop.asm         | 10         | ERROR      | FAIL (Runtime Error)
//!   Error Output: stack underflow
//! -----------------------------------------------------------------
//! Summary: 1/2 passed (50.0%)
//! Failed: 1 tests
//! ```
//!
//! The reporter writes to any [`WriteColor`] sink and keeps no state beyond
//! the running [`Summary`].

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    catalog::TestCase,
    errors::HarnessResult,
    outcome::{ExecutionOutcome, Summary},
};

const NAME_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 10;
const RULE_WIDTH: usize = 65;

// ============================================================================
// ROW CONTENT
// ============================================================================

/// Text of the actual-value column.
pub fn actual_column(outcome: &ExecutionOutcome) -> String {
    match (outcome.actual(), outcome) {
        (Some(actual), _) => actual.to_string(),
        (None, ExecutionOutcome::ParseFailed { .. }) => "?".to_string(),
        (None, _) => "ERROR".to_string(),
    }
}

/// Text of the status column.
pub fn status_label(outcome: &ExecutionOutcome) -> &'static str {
    match outcome {
        ExecutionOutcome::Passed { .. } => "PASS",
        ExecutionOutcome::ValueMismatch { .. } => "FAIL",
        ExecutionOutcome::ParseFailed { .. } => "FAIL (Parse Error)",
        ExecutionOutcome::RuntimeFailed { .. } => "FAIL (Runtime Error)",
        ExecutionOutcome::AssemblyFailed { .. } => "FAIL (Assembly Error)",
    }
}

/// Caption for the captured text printed beneath a failing row.
fn diagnostics_caption(outcome: &ExecutionOutcome) -> Option<&'static str> {
    match outcome {
        ExecutionOutcome::ParseFailed { .. } => Some("Output"),
        ExecutionOutcome::RuntimeFailed { .. } => Some("Error Output"),
        ExecutionOutcome::AssemblyFailed { .. } => Some("Assembler Output"),
        _ => None,
    }
}

// ============================================================================
// REPORTER
// ============================================================================

pub struct Reporter<W: WriteColor> {
    out: W,
    summary: Summary,
}

impl Reporter<StandardStream> {
    /// A reporter on standard output. Whether colour suits the terminal is
    /// decided by the caller.
    pub fn stdout(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self) -> HarnessResult<()> {
        writeln!(
            self.out,
            "{:<NAME_WIDTH$} | {:<VALUE_WIDTH$} | {:<VALUE_WIDTH$} | {:<VALUE_WIDTH$}",
            "Test File", "Expected", "Actual", "Status"
        )?;
        self.rule()
    }

    /// Prints the row for one finished case and counts it.
    pub fn record(&mut self, case: &TestCase, outcome: &ExecutionOutcome) -> HarnessResult<()> {
        self.summary.record(outcome);

        write!(
            self.out,
            "{:<NAME_WIDTH$} | {:<VALUE_WIDTH$} | {:<VALUE_WIDTH$} | ",
            case.name(),
            case.expected(),
            actual_column(outcome)
        )?;
        let color = if outcome.is_pass() {
            Color::Green
        } else {
            Color::Red
        };
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{:<VALUE_WIDTH$}", status_label(outcome))?;
        self.out.reset()?;
        writeln!(self.out)?;

        if let (Some(caption), Some(text)) = (diagnostics_caption(outcome), outcome.diagnostics()) {
            let text = text.trim();
            // An assembler that fails silently gets no extra line.
            if !text.is_empty() || !matches!(outcome, ExecutionOutcome::AssemblyFailed { .. }) {
                writeln!(self.out, "  {}: {}", caption, text)?;
            }
        }
        Ok(())
    }

    /// Prints the closing summary and hands back the final counts.
    pub fn finish(&mut self) -> HarnessResult<Summary> {
        self.rule()?;
        let summary = self.summary;
        writeln!(
            self.out,
            "Summary: {}/{} passed ({:.1}%)",
            summary.passed(),
            summary.total(),
            summary.success_rate()
        )?;
        if summary.has_failures() {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(self.out, "Failed: {} tests", summary.failed())?;
        } else {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(self.out, "All tests passed!")?;
        }
        self.out.reset()?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(summary)
    }

    fn rule(&mut self) -> HarnessResult<()> {
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }
}
