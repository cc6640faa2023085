//! Path resolution between the code library, the documentation project and
//! the overall project root.

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, SyncError};

/// Computes the canonical library-relative path of a source file.
///
/// The result always uses `/` separators, regardless of platform or of
/// backslashes in the input.
pub fn canonicalize(absolute_path: &Path, library_root: &Path) -> Result<String> {
    let relative = absolute_path
        .strip_prefix(library_root)
        .map_err(|_| SyncError::OutsideLibrary {
            path: absolute_path.to_path_buf(),
            root: library_root.to_path_buf(),
        })?;

    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok(joined.replace('\\', "/"))
}

/// Finds the project root from a working directory that may sit inside the
/// documentation subproject.
///
/// For each marker directory name, the path is cut at the first component
/// equal to that marker; the outermost resulting ancestor wins. Without any
/// marker the input is returned unchanged.
pub fn resolve_project_root(candidate_dir: &Path, markers: &[String]) -> PathBuf {
    let components: Vec<Component<'_>> = candidate_dir.components().collect();

    let cut = markers
        .iter()
        .filter_map(|marker| {
            components
                .iter()
                .position(|c| matches!(c, Component::Normal(name) if *name == marker.as_str()))
        })
        .min();

    match cut {
        Some(index) => components[..index].iter().collect(),
        None => candidate_dir.to_path_buf(),
    }
}

/// Capability for finding the project root from a working directory.
pub trait ProjectRootResolver: Send + Sync + std::fmt::Debug {
    /// Returns the project root for the given working directory.
    fn resolve(&self, cwd: &Path) -> PathBuf;
}

/// Resolver using the directory-name heuristic of [`resolve_project_root`].
#[derive(Debug, Clone)]
pub struct MarkerRootResolver {
    markers: Vec<String>,
}

impl MarkerRootResolver {
    /// Creates a resolver for the given marker directory names.
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }
}

impl ProjectRootResolver for MarkerRootResolver {
    fn resolve(&self, cwd: &Path) -> PathBuf {
        let root = resolve_project_root(cwd, &self.markers);
        if root == cwd {
            tracing::debug!(
                "No root marker in {}, using it as the project root",
                cwd.display()
            );
        }
        root
    }
}

/// Resolver that always returns a fixed root.
#[derive(Debug, Clone)]
pub struct FixedRootResolver {
    root: PathBuf,
}

impl FixedRootResolver {
    /// Creates a resolver that ignores the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProjectRootResolver for FixedRootResolver {
    fn resolve(&self, _cwd: &Path) -> PathBuf {
        self.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["website".to_string(), "docs".to_string()]
    }

    #[test]
    fn test_canonicalize() {
        let rel = canonicalize(
            Path::new("/proj/code_library/strategy/a.py"),
            Path::new("/proj/code_library"),
        )
        .unwrap();
        assert_eq!(rel, "strategy/a.py");
    }

    #[test]
    fn test_canonicalize_replaces_backslashes() {
        let rel = canonicalize(
            Path::new("/proj/code_library/strategy\\a.py"),
            Path::new("/proj/code_library"),
        )
        .unwrap();
        assert_eq!(rel, "strategy/a.py");
    }

    #[test]
    fn test_canonicalize_outside_library() {
        let err = canonicalize(Path::new("/elsewhere/a.py"), Path::new("/proj/code_library"))
            .unwrap_err();
        assert!(matches!(err, SyncError::OutsideLibrary { .. }));
    }

    #[test]
    fn test_resolve_root_one_level() {
        let root = resolve_project_root(Path::new("/home/u/proj/website"), &markers());
        assert_eq!(root, PathBuf::from("/home/u/proj"));
    }

    #[test]
    fn test_resolve_root_two_levels() {
        let root = resolve_project_root(Path::new("/home/u/proj/website/docs"), &markers());
        assert_eq!(root, PathBuf::from("/home/u/proj"));
    }

    #[test]
    fn test_resolve_root_outermost_marker_wins() {
        // "docs" appears before "website" here, so it is the outermost cut.
        let root = resolve_project_root(Path::new("/srv/docs/proj/website"), &markers());
        assert_eq!(root, PathBuf::from("/srv"));
    }

    #[test]
    fn test_resolve_root_no_marker() {
        let cwd = Path::new("/home/u/proj");
        assert_eq!(resolve_project_root(cwd, &markers()), cwd);
    }

    #[test]
    fn test_resolve_root_requires_whole_component() {
        let cwd = Path::new("/home/u/mywebsite/src");
        assert_eq!(resolve_project_root(cwd, &markers()), cwd);
    }

    #[test]
    fn test_fixed_resolver() {
        let resolver = FixedRootResolver::new("/fixed");
        assert_eq!(
            resolver.resolve(Path::new("/anything/website")),
            PathBuf::from("/fixed")
        );
    }

    #[test]
    fn test_marker_resolver() {
        let resolver = MarkerRootResolver::new(markers());
        assert_eq!(
            resolver.resolve(Path::new("/p/website")),
            PathBuf::from("/p")
        );
    }
}
