//! The ordered list of test cases a run drives.
//!
//! A catalog is either the compiled-in one ([`Catalog::builtin`]) or loaded
//! from a YAML file ([`Catalog::load_yaml`]):
//!
//! ```yaml
//! - path: test_add.asm
//!   expected: 30
//! - path: prebuilt/loop.bin
//!   expected: 0
//!   kind: artifact
//! ```
//!
//! Paths in a catalog file are resolved relative to the file's directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::errors::{HarnessError, HarnessResult};

/// Builtin cases: source file name and expected top-of-stack value.
const BUILTIN_CASES: &[(&str, i64)] = &[
    ("test_push.asm", 10),
    ("test_pop.asm", 10),
    ("test_dup.asm", 10),
    ("test_halt.asm", 10),
    ("test_add.asm", 30),
    ("test_sub.asm", 20),
    ("test_mult.asm", 30),
    ("test_div.asm", 10),
    ("test_loop.asm", 0),
];

/// Extension given to artifacts produced by the assembler.
pub const ARTIFACT_EXTENSION: &str = "bin";

/// Whether a case starts from source or from a pre-built artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// Assemble first, then execute the generated artifact.
    #[default]
    Source,
    /// Execute the given artifact directly.
    Artifact,
}

/// A single conformance case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
    path: PathBuf,
    expected: i64,
    kind: CaseKind,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        expected: i64,
        kind: CaseKind,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            expected,
            kind,
        }
    }

    /// A source case whose name is its path as given.
    pub fn source(path: impl Into<PathBuf>, expected: i64) -> Self {
        let path = path.into();
        Self::new(path.display().to_string(), path, expected, CaseKind::Source)
    }

    /// A pre-built artifact case whose name is its path as given.
    pub fn artifact(path: impl Into<PathBuf>, expected: i64) -> Self {
        let path = path.into();
        Self::new(path.display().to_string(), path, expected, CaseKind::Artifact)
    }

    /// The identifier shown in the report.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source file (for source cases) or the artifact (for artifact cases).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expected(&self) -> i64 {
        self.expected
    }

    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    /// Where the assembler writes this case's artifact. `None` for artifact cases.
    ///
    /// Never equal to the source path, so cleanup cannot remove the source.
    pub fn generated_artifact_path(&self) -> Option<PathBuf> {
        if self.kind == CaseKind::Artifact {
            return None;
        }
        let derived = self.path.with_extension(ARTIFACT_EXTENSION);
        if derived == self.path {
            let mut appended = self.path.clone().into_os_string();
            appended.push(".");
            appended.push(ARTIFACT_EXTENSION);
            return Some(PathBuf::from(appended));
        }
        Some(derived)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntry {
    path: PathBuf,
    expected: i64,
    #[serde(default)]
    kind: CaseKind,
    name: Option<String>,
}

/// An ordered, read-only sequence of test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    cases: Vec<TestCase>,
}

impl Catalog {
    pub fn from_cases(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The compiled-in catalog, with sources resolved under `test_root`.
    pub fn builtin(test_root: &Path) -> Self {
        let cases = BUILTIN_CASES
            .iter()
            .map(|&(file, expected)| {
                TestCase::new(file, test_root.join(file), expected, CaseKind::Source)
            })
            .collect();
        Self { cases }
    }

    /// Loads a catalog from a YAML list of entries.
    pub fn load_yaml(path: &Path) -> HarnessResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| HarnessError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        match Self::parse_yaml(&content, base) {
            Ok(catalog) => Ok(catalog),
            Err(err) => Err(HarnessError::catalog_parse(path, content, err)),
        }
    }

    fn parse_yaml(content: &str, base: &Path) -> Result<Self, serde_yaml::Error> {
        let entries: Vec<CatalogEntry> = serde_yaml::from_str(content)?;
        let cases = entries
            .into_iter()
            .map(|entry| {
                let name = entry
                    .name
                    .unwrap_or_else(|| entry.path.display().to_string());
                TestCase::new(name, base.join(&entry.path), entry.expected, entry.kind)
            })
            .collect();
        Ok(Self { cases })
    }

    /// Keeps only cases whose name contains `pattern`, ignoring case.
    pub fn filtered(self, pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        let cases = self
            .cases
            .into_iter()
            .filter(|case| case.name.to_lowercase().contains(&pattern))
            .collect();
        Self { cases }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
