//! Shared fixtures for integration tests.
//!
//! A `Sandbox` is a scratch directory holding a fake toolchain built from
//! `sh`: the "assembler" copies its source to the output path, and the "VM"
//! is `sh` itself running the copied file. Test sources are therefore small
//! shell scripts that print whatever the case needs, e.g.
//! `echo "Top of stack: 10"`.
//!
//! A source containing a `# assemble: fail` line makes the assembler exit 1.

#![allow(dead_code)]

use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

use vmharness::parse::TOP_OF_STACK_LABEL;

const FAKE_ASSEMBLER: &str = r#"#!/bin/sh
if grep -q '^# assemble: fail' "$1"; then
    echo "line 1: unknown mnemonic" >&2
    exit 1
fi
cp "$1" "$2"
"#;

pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// A fresh directory unique to this test and process.
    pub fn new(name: &str) -> Self {
        let root = env::temp_dir().join(format!("vmharness-{}-{}", name, process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("fake_asm.sh"), FAKE_ASSEMBLER).unwrap();
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// The assembler command line to hand to the harness.
    pub fn assembler(&self) -> String {
        format!("sh {}", self.path("fake_asm.sh").display())
    }

    /// The VM command line to hand to the harness.
    pub fn vm(&self) -> &'static str {
        "sh"
    }

    /// All files under `relative` with the given extension.
    pub fn files_with_extension(&self, relative: &str, ext: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.path(relative)) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|x| x == ext).unwrap_or(false))
            .collect()
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// A source whose run reports `value` as the top of stack.
pub fn reports(value: i64) -> String {
    format!("echo \"{}{}\"\n", TOP_OF_STACK_LABEL, value)
}

/// A source whose run fails with `message` on stderr.
pub fn crashes(message: &str) -> String {
    format!("echo \"{}\" >&2\nexit 1\n", message)
}

/// A source the fake assembler rejects.
pub fn rejected() -> String {
    "# assemble: fail\n".to_string()
}
