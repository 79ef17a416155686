//! vmharness: an end-to-end conformance harness for an external stack
//! assembler and virtual machine.
//!
//! Each [`TestCase`] is optionally assembled, executed on the VM, and its
//! reported `Top of stack: <int>` value compared to the expected one. The
//! [`Reporter`] prints a row per case and a closing [`Summary`].

pub use crate::catalog::{CaseKind, Catalog, TestCase};
pub use crate::config::{HarnessConfig, ToolCommand};
pub use crate::errors::{HarnessError, HarnessResult};
pub use crate::outcome::{ExecutionOutcome, Summary};
pub use crate::pipeline::{ArtifactGuard, Pipeline, ProcessToolchain, ToolRun, Toolchain};
pub use crate::report::Reporter;

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod outcome;
pub mod parse;
pub mod pipeline;
pub mod report;
