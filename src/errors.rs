//! Harness-level errors.
//!
//! These are failures of the harness itself, not of a test case: a catalog
//! file that cannot be loaded, a tool command that is empty, a report that
//! cannot be written. Per-case failures are `ExecutionOutcome`s and never
//! surface here.

use std::{
    io,
    path::{Path, PathBuf},
};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    #[error("failed to read catalog {}", .path.display())]
    #[diagnostic(code(vmharness::catalog::read))]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid catalog: {message}")]
    #[diagnostic(
        code(vmharness::catalog::parse),
        help("a catalog is a YAML list of `{{ path, expected, kind }}` entries; kind is `source` or `artifact`")
    )]
    CatalogParse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("the {tool} command is empty")]
    #[diagnostic(code(vmharness::config::empty_command))]
    EmptyCommand { tool: &'static str },

    #[error("failed to write report")]
    #[diagnostic(code(vmharness::report::io))]
    Report(#[from] io::Error),
}

impl HarnessError {
    pub(crate) fn catalog_parse(path: &Path, content: String, err: serde_yaml::Error) -> Self {
        let span = err.location().map(|loc| SourceSpan::from((loc.index(), 0)));
        HarnessError::CatalogParse {
            message: err.to_string(),
            src: NamedSource::new(path.display().to_string(), content),
            span,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
