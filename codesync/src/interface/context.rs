//! Execution context for codesync operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::embed::EmbedTransform;
use crate::index::{AffectedDocumentSet, DocumentScanner};
use crate::io::{FileCache, RealFileCache};
use crate::paths::{canonicalize, MarkerRootResolver, ProjectRootResolver};

/// Context for codesync operations.
///
/// Contains configuration, project layout, and file system access.
#[derive(Debug)]
pub struct Context {
    /// Configuration.
    pub config: Config,
    /// File cache for reading files, based at the project root.
    pub file_cache: Arc<dyn FileCache>,
    /// Finds the project root from a working directory.
    pub root_resolver: Arc<dyn ProjectRootResolver>,
    /// Working directory the context was created for.
    pub base_dir: PathBuf,
    /// Project root holding the code library and the documentation project.
    pub project_root: PathBuf,
    /// Library directory name as written in embed directives.
    library_name: String,
}

impl Context {
    /// Creates a context using the directory-name root heuristic.
    pub fn new(config: Config, base_dir: PathBuf) -> Self {
        let resolver = Arc::new(MarkerRootResolver::new(config.root_markers.clone()));
        Self::with_root_resolver(config, base_dir, resolver)
    }

    /// Creates a context with an explicit root resolver.
    pub fn with_root_resolver(
        config: Config,
        base_dir: PathBuf,
        root_resolver: Arc<dyn ProjectRootResolver>,
    ) -> Self {
        let project_root = root_resolver.resolve(&base_dir);
        let file_cache = Arc::new(RealFileCache::new(project_root.clone()));
        let library_name = config.library_name();

        Self {
            config,
            file_cache,
            root_resolver,
            base_dir,
            project_root,
            library_name,
        }
    }

    /// Replaces the file cache.
    pub fn with_file_cache(mut self, file_cache: Arc<dyn FileCache>) -> Self {
        self.file_cache = file_cache;
        self
    }

    /// Creates a context with default configuration.
    pub fn default_for_dir(base_dir: PathBuf) -> Self {
        Self::new(Config::default(), base_dir)
    }

    /// Creates a context from the current directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        let base_dir = std::env::current_dir()?;
        let config = match crate::config::read_config(&base_dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable configuration: {}", e);
                Config::default()
            }
        };
        Ok(Self::new(config, base_dir))
    }

    /// Absolute path of the code library.
    pub fn library_root(&self) -> PathBuf {
        self.project_root.join(&self.config.library_dir)
    }

    /// Absolute path of the documentation project.
    pub fn docs_root(&self) -> PathBuf {
        self.project_root.join(&self.config.docs_dir)
    }

    /// Library directory name as written in embed directives.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Resolves a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Canonical library-relative form of a source path.
    pub fn relative_source(&self, source: &Path) -> Result<String> {
        canonicalize(&self.resolve_path(source), &self.library_root())
    }

    /// Returns a scanner over the documentation project.
    pub fn scanner(&self) -> DocumentScanner<'_> {
        DocumentScanner::new(
            self.file_cache.as_ref(),
            &self.config.doc_patterns,
            &self.library_name,
        )
        .with_docs_dir(&self.config.docs_dir)
    }

    /// Returns the documentation files embedding `source`.
    pub fn find_referencing(&self, source: &Path) -> Result<AffectedDocumentSet> {
        let relative = self.relative_source(source)?;
        self.scanner().find_referencing_relative(&relative)
    }

    /// Returns an embedding transform for this project.
    pub fn embed_transform(&self) -> EmbedTransform<'_> {
        EmbedTransform::new(
            &self.config,
            self.file_cache.as_ref(),
            self.root_resolver.as_ref(),
            self.base_dir.clone(),
        )
    }
}
