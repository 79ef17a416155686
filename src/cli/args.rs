//! Command-line arguments for the `vmharness` binary.
//!
//! Every flag is optional: with none, the harness runs the builtin catalog
//! from `test/` with the conventional assembler and VM commands.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    config::{HarnessConfig, ToolCommand, DEFAULT_ASSEMBLER, DEFAULT_TEST_ROOT, DEFAULT_VM},
    errors::HarnessResult,
};

#[derive(Debug, Parser)]
#[command(
    name = "vmharness",
    version,
    about = "Assemble, run and check conformance programs against a stack VM."
)]
pub struct HarnessArgs {
    /// Assembler command line; the source and output paths are appended.
    #[arg(long, env = "VMHARNESS_ASSEMBLER", default_value = DEFAULT_ASSEMBLER)]
    pub assembler: String,

    /// VM command line; the artifact path is appended.
    #[arg(long, env = "VMHARNESS_VM", default_value = DEFAULT_VM)]
    pub vm: String,

    /// Directory the builtin cases live in.
    #[arg(long, default_value = DEFAULT_TEST_ROOT)]
    pub test_root: PathBuf,

    /// YAML catalog to run instead of the builtin one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Run only cases whose name contains this substring.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// When to colour the status column.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Exit 0 even when cases fail.
    #[arg(long)]
    pub allow_failures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl HarnessArgs {
    pub fn to_config(&self) -> HarnessResult<HarnessConfig> {
        let defaults = HarnessConfig::default();
        let use_colors = match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => defaults.use_colors,
        };
        Ok(HarnessConfig {
            assembler: ToolCommand::parse("assembler", &self.assembler)?,
            vm: ToolCommand::parse("vm", &self.vm)?,
            test_root: self.test_root.clone(),
            use_colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_consistent() {
        HarnessArgs::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let args = HarnessArgs::try_parse_from([
            "vmharness",
            "--assembler",
            "sh fake_asm.sh",
            "--vm",
            "target/vm",
            "--test-root",
            "suite",
            "-f",
            "add",
            "--color",
            "never",
            "--allow-failures",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.assembler.program(), "sh");
        assert_eq!(config.assembler.args(), ["fake_asm.sh".to_string()]);
        assert_eq!(config.vm.to_string(), "target/vm");
        assert_eq!(config.test_root, PathBuf::from("suite"));
        assert!(!config.use_colors);
        assert_eq!(args.filter.as_deref(), Some("add"));
        assert!(args.allow_failures);
    }

    #[test]
    fn no_flags_yield_the_default_config() {
        let args = HarnessArgs::try_parse_from(["vmharness"]).unwrap();
        let config = args.to_config().unwrap();
        let defaults = HarnessConfig::default();
        assert_eq!(config.assembler, defaults.assembler);
        assert_eq!(config.vm, defaults.vm);
        assert_eq!(config.test_root, defaults.test_root);
        assert_eq!(config.use_colors, defaults.use_colors);
    }

    #[test]
    fn unknown_color_mode_is_rejected() {
        assert!(HarnessArgs::try_parse_from(["vmharness", "--color", "sometimes"]).is_err());
    }
}
