//! Identity primitives for local paths and store-keyed artifacts.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A classified local location: an existing or intended file or folder.
///
/// Classification consults the filesystem first; for paths that do not
/// exist yet, a trailing separator marks folder intent and anything else
/// is treated as a file. Identity is the path string and never changes
/// apart from an explicit [`ResourcePath::rename`] of the final
/// component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourcePath {
    /// A regular file, existing or intended.
    File {
        /// Identity path of the file.
        path: PathBuf,
    },
    /// A directory, existing or intended. Stored without a trailing
    /// separator.
    Folder {
        /// Identity path of the directory.
        path: PathBuf,
    },
}

impl ResourcePath {
    /// Classify a raw path string as a file or a folder.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let path = Path::new(raw);
        if path.is_file() {
            return Self::File {
                path: path.to_path_buf(),
            };
        }
        if path.is_dir() {
            return Self::Folder {
                path: path.to_path_buf(),
            };
        }
        if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') {
            Self::Folder {
                path: PathBuf::from(raw.trim_end_matches([MAIN_SEPARATOR, '/'])),
            }
        } else {
            Self::File {
                path: path.to_path_buf(),
            }
        }
    }

    /// Wrap an already-known file location.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Wrap an already-known folder location.
    #[must_use]
    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self::Folder { path: path.into() }
    }

    /// Identity path of the resource.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File { path } | Self::Folder { path } => path,
        }
    }

    /// Final component of the identity path, when representable.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.path().file_name().and_then(|name| name.to_str())
    }

    /// Parent of the identity path.
    #[must_use]
    pub fn parent(&self) -> Option<&Path> {
        self.path().parent()
    }

    /// Whether the identity path currently exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Whether this identity names a folder.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Replace the final component of the identity path.
    pub fn rename(&mut self, name: &str) {
        match self {
            Self::File { path } | Self::Folder { path } => path.set_file_name(name),
        }
    }
}

/// A local artifact paired with the logical key that names it in the
/// object store. The two identities are deliberately decoupled: where
/// the bytes live on disk says nothing about how the store addresses
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePath {
    local: PathBuf,
    key: String,
}

impl StorePath {
    /// Pair a local path with its store key.
    #[must_use]
    pub fn new(local: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            key: key.into(),
        }
    }

    /// Local location of the artifact.
    #[must_use]
    pub fn local(&self) -> &Path {
        &self.local
    }

    /// Logical key naming the artifact in the store.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Lexically normalize a path, folding `.` and `..` components without
/// touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Join `path` onto `root` and normalize the result lexically. An
/// absolute `path` replaces `root`, matching filesystem join semantics.
#[must_use]
pub fn join(root: &Path, path: &Path) -> PathBuf {
    normalize(&root.join(path))
}

/// Compute the normalized relative path of `path` with respect to
/// `root`. Both inputs are normalized lexically first; the result walks
/// up with `..` where the two diverge.
#[must_use]
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    let root = normalize(root);
    let path = normalize(path);

    let mut root_parts = root.components().peekable();
    let mut path_parts = path.components().peekable();

    while let (Some(a), Some(b)) = (root_parts.peek(), path_parts.peek()) {
        if a == b {
            root_parts.next();
            path_parts.next();
        } else {
            break;
        }
    }

    let mut relative = PathBuf::new();
    for _ in root_parts {
        relative.push("..");
    }
    for part in path_parts {
        relative.push(part.as_os_str());
    }
    normalize(&relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn classify_consults_the_filesystem_first() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let file = temp.path().join("report.txt");
        fs::write(&file, "data")?;

        let classified = ResourcePath::classify(file.to_str().ok_or("utf8")?);
        assert!(matches!(classified, ResourcePath::File { .. }));

        let classified = ResourcePath::classify(temp.path().to_str().ok_or("utf8")?);
        assert!(classified.is_folder());
        Ok(())
    }

    #[test]
    fn classify_uses_trailing_separator_for_missing_paths() {
        let folder = ResourcePath::classify("build/out/");
        assert!(folder.is_folder());
        assert_eq!(folder.path(), Path::new("build/out"));

        let file = ResourcePath::classify("build/out.bin");
        assert!(!file.is_folder());
    }

    #[test]
    fn rename_replaces_only_the_final_component() {
        let mut resource = ResourcePath::file("work/results.tar");
        resource.rename("results_out.tar");
        assert_eq!(resource.path(), Path::new("work/results_out.tar"));
        assert_eq!(resource.name(), Some("results_out.tar"));
        assert_eq!(resource.parent(), Some(Path::new("work")));
    }

    #[test]
    fn normalize_folds_dot_segments() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn join_folds_dot_segments_and_respects_absolute_paths() {
        assert_eq!(
            join(Path::new("/work"), Path::new("deps/../a.txt")),
            PathBuf::from("/work/a.txt")
        );
        assert_eq!(
            join(Path::new("/work"), Path::new("./b.txt")),
            PathBuf::from("/work/b.txt")
        );
        assert_eq!(
            join(Path::new("/work"), Path::new("/opt/tool")),
            PathBuf::from("/opt/tool")
        );
    }

    #[test]
    fn relative_to_walks_up_where_roots_diverge() {
        assert_eq!(
            relative_to(Path::new("/work/run"), Path::new("/work/run/deps/a.txt")),
            PathBuf::from("deps/a.txt")
        );
        assert_eq!(
            relative_to(Path::new("/work/run"), Path::new("/work/other/b.txt")),
            PathBuf::from("../other/b.txt")
        );
        assert_eq!(
            relative_to(Path::new("/work"), Path::new("/work")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn store_path_keeps_identities_decoupled() {
        let artifact = StorePath::new("/tmp/ws_1_in.tar", "submission/ws_1/ws_1_in.tar");
        assert_eq!(artifact.local(), Path::new("/tmp/ws_1_in.tar"));
        assert_eq!(artifact.key(), "submission/ws_1/ws_1_in.tar");
    }
}
