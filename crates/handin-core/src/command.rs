//! Command specification and late-bound dependency resolution.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{ManifestError, ManifestResult};

/// A unit of work as the student describes it: shell tokens, a wall
/// clock budget, a core count, and the name of the dependency manifest.
///
/// The manifest is late bound: it is resolved against a concrete root
/// at submission time, not when the command is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Shell tokens of the command to execute remotely.
    pub shell: Vec<String>,
    /// Wall-clock budget for the remote execution, in seconds.
    pub timeout_secs: u64,
    /// Number of cores requested for the run.
    pub cores: u8,
    /// Dependency manifest file, one glob pattern per line.
    pub manifest: PathBuf,
}

impl CommandSpec {
    /// Build a spec from a whitespace-separated command line.
    #[must_use]
    pub fn new(command: &str, timeout_secs: u64, cores: u8, manifest: impl Into<PathBuf>) -> Self {
        Self {
            shell: command.split_whitespace().map(str::to_string).collect(),
            timeout_secs,
            cores,
            manifest: manifest.into(),
        }
    }

    /// Expand the dependency manifest against `root`.
    ///
    /// Each non-blank line is a glob pattern matched against paths
    /// relative to `root`; the result is the sorted, deduplicated set
    /// of existing matches. A missing manifest file resolves to an
    /// empty set so that command lines without extra dependencies keep
    /// working.
    ///
    /// # Errors
    ///
    /// Returns an error when the manifest cannot be read (other than
    /// not existing), a pattern fails to compile, or the traversal of
    /// `root` fails.
    pub fn resolve_manifest(&self, root: &Path) -> ManifestResult<Vec<PathBuf>> {
        let manifest_path = root.join(&self.manifest);
        let contents = match std::fs::read_to_string(&manifest_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ManifestError::Io {
                    path: manifest_path,
                    source: err,
                });
            }
        };

        let mut builder = GlobSetBuilder::new();
        let mut patterns = 0usize;
        for line in contents.lines() {
            let pattern = line.trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern).map_err(|source| ManifestError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
            patterns += 1;
        }
        if patterns == 0 {
            return Ok(Vec::new());
        }
        let globs = builder.build().map_err(|source| ManifestError::Pattern {
            pattern: "<manifest>".to_string(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| ManifestError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.path() == root {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if globs.is_match(relative) {
                matches.push(relative.to_path_buf());
            }
        }
        matches.sort();
        matches.dedup();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn new_splits_the_command_line() {
        let spec = CommandSpec::new("./solver --threads 4", 60, 1, "deps.aws");
        assert_eq!(spec.shell, vec!["./solver", "--threads", "4"]);
        assert_eq!(spec.timeout_secs, 60);
        assert_eq!(spec.cores, 1);
    }

    #[test]
    fn missing_manifest_resolves_to_empty_set() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let spec = CommandSpec::new("echo hi", 60, 1, "deps.aws");
        assert!(spec.resolve_manifest(temp.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn manifest_patterns_expand_against_the_root() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        fs::create_dir(temp.path().join("data"))?;
        fs::write(temp.path().join("data/a.csv"), "a")?;
        fs::write(temp.path().join("data/b.csv"), "b")?;
        fs::write(temp.path().join("data/ignore.txt"), "x")?;
        fs::write(temp.path().join("deps.aws"), "data/*.csv\n\n")?;

        let spec = CommandSpec::new("echo hi", 60, 1, "deps.aws");
        let resolved = spec.resolve_manifest(temp.path())?;
        assert_eq!(
            resolved,
            vec![PathBuf::from("data/a.csv"), PathBuf::from("data/b.csv")]
        );
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_reported() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("deps.aws"), "[\n")?;
        let spec = CommandSpec::new("echo hi", 60, 1, "deps.aws");
        let err = spec
            .resolve_manifest(temp.path())
            .expect_err("bad glob should fail");
        assert!(matches!(err, ManifestError::Pattern { .. }));
        Ok(())
    }
}
