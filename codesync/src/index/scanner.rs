//! Reverse lookup from a source file to the documents that embed it.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::errors::Result;
use crate::io::FileCache;
use crate::paths::canonicalize;

use super::matcher::ReferenceMatcher;

/// Documentation files referencing one source file, relative to the
/// documentation project root. Recomputed for every propagation.
pub type AffectedDocumentSet = IndexSet<PathBuf>;

/// Scans the documentation project for embed directives.
#[derive(Debug)]
pub struct DocumentScanner<'a> {
    files: &'a dyn FileCache,
    patterns: &'a [String],
    library_name: &'a str,
    /// Documentation project directory, relative to the cache base.
    docs_dir: PathBuf,
}

impl<'a> DocumentScanner<'a> {
    /// Creates a scanner over `files`, whose base is the documentation
    /// project root.
    pub fn new(files: &'a dyn FileCache, patterns: &'a [String], library_name: &'a str) -> Self {
        Self {
            files,
            patterns,
            library_name,
            docs_dir: PathBuf::new(),
        }
    }

    /// Places the documentation project at `docs_dir` below the cache base.
    pub fn with_docs_dir(mut self, docs_dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = docs_dir.into();
        self
    }

    /// Enumerates every documentation file matched by the configured patterns,
    /// relative to the documentation project.
    pub fn documents(&self) -> Result<Vec<PathBuf>> {
        let prefix = if self.docs_dir.as_os_str().is_empty() {
            String::new()
        } else {
            let escaped = glob::Pattern::escape(&self.docs_dir.to_string_lossy());
            format!("{}/", escaped.trim_end_matches('/'))
        };

        let mut docs = Vec::new();
        for pattern in self.patterns {
            for path in self.files.glob(&format!("{}{}", prefix, pattern))? {
                let relative = path
                    .strip_prefix(&self.docs_dir)
                    .map(Path::to_path_buf)
                    .unwrap_or(path);
                docs.push(relative);
            }
        }
        docs.sort();
        docs.dedup();
        Ok(docs)
    }

    /// Returns the documents embedding the source file at `source_path`.
    ///
    /// Unreadable documents are skipped. An empty set is a normal outcome.
    pub fn find_referencing(
        &self,
        source_path: &Path,
        library_root: &Path,
    ) -> Result<AffectedDocumentSet> {
        let relative = canonicalize(source_path, library_root)?;
        self.find_referencing_relative(&relative)
    }

    /// Same as [`find_referencing`](Self::find_referencing) for an already
    /// canonical library-relative path.
    pub fn find_referencing_relative(&self, relative: &str) -> Result<AffectedDocumentSet> {
        let matcher = ReferenceMatcher::new(self.library_name, relative);
        let mut affected = AffectedDocumentSet::new();

        for doc in self.documents()? {
            let content = match self.files.read(&self.docs_dir.join(&doc)) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("Skipping unreadable document {}: {}", doc.display(), e);
                    continue;
                }
            };

            if matcher.is_match(&content) {
                tracing::debug!("{} embeds {}", doc.display(), relative);
                affected.insert(doc);
            }
        }

        Ok(affected)
    }
}
