//! The `vmharness` command-line entry point.
//!
//! Wires the pieces together: arguments become a [`HarnessConfig`], the
//! catalog is loaded, the pipeline drives each case through the process
//! toolchain, and the reporter prints to stdout. Logging goes to stderr.

use std::process;

use clap::Parser;
use log::info;

use crate::{
    catalog::Catalog,
    config::HarnessConfig,
    errors::{HarnessError, HarnessResult},
    outcome::Summary,
    pipeline::{Pipeline, ProcessToolchain},
    report::Reporter,
};

pub mod args;

pub use args::{ColorMode, HarnessArgs};

/// Every case passed, or failures were allowed.
pub const EXIT_SUCCESS: i32 = 0;
/// At least one case failed.
pub const EXIT_FAILURES: i32 = 1;
/// The harness itself could not run.
pub const EXIT_HARNESS_ERROR: i32 = 2;

/// The main entry point for the CLI.
pub fn run() {
    let args = HarnessArgs::parse();
    init_logging();

    match execute(&args) {
        Ok(summary) => process::exit(exit_code(&summary, args.allow_failures)),
        Err(e) => {
            print_error(e);
            process::exit(EXIT_HARNESS_ERROR);
        }
    }
}

/// Loads the catalog and runs it against the configured toolchain.
pub fn execute(args: &HarnessArgs) -> HarnessResult<Summary> {
    let config = args.to_config()?;
    let catalog = load_catalog(args, &config)?;
    info!(
        "running {} case(s) with assembler `{}` and vm `{}`",
        catalog.len(),
        config.assembler,
        config.vm
    );

    let pipeline = Pipeline::new(ProcessToolchain::from_config(&config));
    let mut reporter = Reporter::stdout(config.use_colors);
    pipeline.run(&catalog, &mut reporter)
}

pub fn exit_code(summary: &Summary, allow_failures: bool) -> i32 {
    if summary.has_failures() && !allow_failures {
        EXIT_FAILURES
    } else {
        EXIT_SUCCESS
    }
}

fn load_catalog(args: &HarnessArgs, config: &HarnessConfig) -> HarnessResult<Catalog> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load_yaml(path)?,
        None => Catalog::builtin(&config.test_root),
    };
    Ok(match &args.filter {
        Some(pattern) => catalog.filtered(pattern),
        None => catalog,
    })
}

/// `RUST_LOG` controls verbosity; warnings and errors are shown by default.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

pub fn print_error(error: HarnessError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
