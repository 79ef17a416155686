//! Per-case outcomes and the aggregate run summary.

/// The single result of driving one test case through the pipeline.
///
/// Produced exactly once per case and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The VM reported the expected value.
    Passed { actual: i64 },
    /// The VM reported a value, but not the expected one.
    ValueMismatch { actual: i64, expected: i64 },
    /// The VM exited successfully without a parseable top-of-stack report.
    ParseFailed { output: String },
    /// The VM exited unsuccessfully (or could not be started).
    RuntimeFailed { output: String },
    /// The assembler exited unsuccessfully (or could not be started).
    AssemblyFailed { diagnostics: String },
}

impl ExecutionOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ExecutionOutcome::Passed { .. })
    }

    /// The value the VM reported, for outcomes that have one.
    pub fn actual(&self) -> Option<i64> {
        match self {
            ExecutionOutcome::Passed { actual }
            | ExecutionOutcome::ValueMismatch { actual, .. } => Some(*actual),
            _ => None,
        }
    }

    /// Captured tool output worth showing beneath a report row.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::ParseFailed { output }
            | ExecutionOutcome::RuntimeFailed { output } => Some(output.as_str()),
            ExecutionOutcome::AssemblyFailed { diagnostics } => Some(diagnostics.as_str()),
            _ => None,
        }
    }
}

/// Pass/fail counts accumulated over a run.
///
/// Only ever built by recording outcomes, so `passed + failed` is always the
/// number of outcomes seen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    passed: usize,
    failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &ExecutionOutcome) {
        if outcome.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Percentage of passing cases; `0.0` for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total() as f64) * 100.0
    }
}

impl<'a> FromIterator<&'a ExecutionOutcome> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a ExecutionOutcome>>(iter: I) -> Self {
        let mut summary = Summary::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}
