//! File system abstraction for testability.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for read-side file system operations, allowing both real and
/// virtual implementations.
pub trait FileCache: Send + Sync + std::fmt::Debug {
    /// Reads the contents of a file.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Checks if a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists files matching a glob pattern, relative to the cache's base.
    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>>;
}

/// Real file system implementation.
#[derive(Debug, Clone, Default)]
pub struct RealFileCache {
    /// Base directory for relative paths.
    pub base_dir: PathBuf,
}

impl RealFileCache {
    /// Creates a new RealFileCache with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolves a path relative to the base directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl FileCache for RealFileCache {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
        // The base directory may itself contain glob metacharacters.
        let base = glob::Pattern::escape(&self.base_dir.to_string_lossy());
        let full_pattern = format!("{}/{}", base.trim_end_matches('/'), pattern);

        let paths = glob::glob(&full_pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .map(|p| {
                p.strip_prefix(&self.base_dir)
                    .map(|p| p.to_path_buf())
                    .unwrap_or(p)
            })
            .collect();

        Ok(paths)
    }
}

/// Virtual file system for testing.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    /// Files stored in memory.
    files: HashMap<PathBuf, String>,
}

impl VirtualFS {
    /// Creates a new empty virtual file system.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Adds a file to the virtual file system.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Removes a file from the virtual file system.
    pub fn remove_file(&mut self, path: &Path) {
        self.files.remove(path);
    }

    /// Lists all files in the virtual file system.
    pub fn list_files(&self) -> Vec<&PathBuf> {
        self.files.keys().collect()
    }
}

impl FileCache for VirtualFS {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let mut matches: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| glob_pattern.matches_path(p))
            .cloned()
            .collect();
        matches.sort();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_virtual_fs_basic() {
        let mut vfs = VirtualFS::new();
        vfs.add_file("docs/intro.md", "# Intro");

        assert!(vfs.exists(Path::new("docs/intro.md")));
        assert!(!vfs.exists(Path::new("docs/other.md")));
        assert_eq!(vfs.read(Path::new("docs/intro.md")).unwrap(), "# Intro");
    }

    #[test]
    fn test_virtual_fs_read_missing() {
        let vfs = VirtualFS::new();
        let err = vfs.read(Path::new("nope.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_virtual_fs_remove() {
        let mut vfs = VirtualFS::new();
        vfs.add_file("a.md", "a");
        vfs.remove_file(Path::new("a.md"));
        assert!(vfs.list_files().is_empty());
    }

    #[test]
    fn test_virtual_fs_glob() {
        let mut vfs = VirtualFS::new();
        vfs.add_file("docs/guide/setup.md", "setup");
        vfs.add_file("docs/index.mdx", "index");
        vfs.add_file("src/app.py", "print()");

        let md = vfs.glob("docs/**/*.md").unwrap();
        assert_eq!(md, vec![PathBuf::from("docs/guide/setup.md")]);

        let mdx = vfs.glob("docs/**/*.mdx").unwrap();
        assert_eq!(mdx.len(), 1);
    }

    #[test]
    fn test_real_file_cache() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());
        fs::write(dir.path().join("test.md"), "content").unwrap();

        assert!(cache.exists(Path::new("test.md")));
        assert_eq!(cache.read(Path::new("test.md")).unwrap(), "content");
    }

    #[test]
    fn test_real_file_cache_glob_recursive() {
        let dir = tempdir().unwrap();
        let cache = RealFileCache::new(dir.path().to_path_buf());

        fs::create_dir_all(dir.path().join("docs/nested")).unwrap();
        fs::write(dir.path().join("docs/a.md"), "a").unwrap();
        fs::write(dir.path().join("docs/nested/b.md"), "b").unwrap();
        fs::write(dir.path().join("docs/c.txt"), "c").unwrap();

        let mut files = cache.glob("docs/**/*.md").unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![PathBuf::from("docs/a.md"), PathBuf::from("docs/nested/b.md")]
        );
    }
}
