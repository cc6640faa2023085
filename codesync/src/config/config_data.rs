//! Configuration data structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::language::Language;
use super::strategy_kind::StrategyKind;

/// Main configuration structure for codesync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Code library directory, relative to the project root.
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,

    /// Documentation project directory, relative to the project root.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Glob patterns for documentation files, relative to `docs_dir`.
    #[serde(default = "default_doc_patterns")]
    pub doc_patterns: Vec<String>,

    /// File extensions in the code library that trigger propagation.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Directory names marking the documentation subproject, used to find
    /// the project root from a nested working directory.
    #[serde(default = "default_root_markers")]
    pub root_markers: Vec<String>,

    /// Custom extension-to-language entries (override built-ins).
    #[serde(default)]
    pub languages: Vec<Language>,

    /// Watch configuration.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Embedding transform configuration.
    #[serde(default)]
    pub embed: EmbedConfig,

    /// Update propagation configuration.
    #[serde(default)]
    pub propagation: PropagationConfig,
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("code_library")
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("website")
}

fn default_doc_patterns() -> Vec<String> {
    vec!["docs/**/*.md".to_string(), "docs/**/*.mdx".to_string()]
}

fn default_source_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_root_markers() -> Vec<String> {
    vec!["website".to_string(), "docs".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            docs_dir: default_docs_dir(),
            doc_patterns: default_doc_patterns(),
            source_extensions: default_source_extensions(),
            root_markers: default_root_markers(),
            languages: Vec::new(),
            watch: WatchConfig::default(),
            embed: EmbedConfig::default(),
            propagation: PropagationConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a language by identifier, checking custom languages first.
    pub fn find_language(&self, identifier: &str) -> Option<Language> {
        if let Some(lang) = self.languages.iter().find(|l| l.matches(identifier)) {
            return Some(lang.clone());
        }
        super::templates::find_language(identifier)
    }

    /// Infers the code block language for a source file from its extension,
    /// falling back to the configured default.
    pub fn language_for_path(&self, path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.find_language(ext))
            .map(|lang| lang.name)
            .unwrap_or_else(|| self.embed.default_language.clone())
    }

    /// Name of the code library directory as authors write it in directives.
    pub fn library_name(&self) -> String {
        self.library_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.library_dir.to_string_lossy().into_owned())
    }

    /// Returns true if the path has one of the watched source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.source_extensions.iter().any(|s| s == ext))
            .unwrap_or(false)
    }
}

/// Watch mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period of the debounce coordinator, in milliseconds.
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Write-settle window applied per path before an event is forwarded.
    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    /// Glob patterns (relative to the library root) to ignore.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_debounce() -> u64 {
    400
}

fn default_settle() -> u64 {
    150
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            settle_ms: default_settle(),
            exclude: Vec::new(),
        }
    }
}

/// Embedding transform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Language tag used when neither the directive nor the extension names one.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Bolded labels that open a rationale section in a source file.
    #[serde(default = "default_rationale_labels")]
    pub rationale_labels: Vec<String>,

    /// Title of the admonition holding the extracted rationale.
    #[serde(default = "default_rationale_title")]
    pub rationale_title: String,

    /// Admonition kind used for the rationale block.
    #[serde(default = "default_admonition")]
    pub admonition: String,
}

fn default_language() -> String {
    "python".to_string()
}

fn default_rationale_labels() -> Vec<String> {
    vec!["Design Rationale".to_string(), "设计理由".to_string()]
}

fn default_rationale_title() -> String {
    "Design Rationale".to_string()
}

fn default_admonition() -> String {
    "info".to_string()
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            rationale_labels: default_rationale_labels(),
            rationale_title: default_rationale_title(),
            admonition: default_admonition(),
        }
    }
}

/// Update propagation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Strategies to try per document, in order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,

    /// Label of the hidden timestamp marker comment.
    #[serde(default = "default_marker_label")]
    pub marker_label: String,
}

fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::all().to_vec()
}

fn default_marker_label() -> String {
    "Code updated".to_string()
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            marker_label: default_marker_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.library_dir, PathBuf::from("code_library"));
        assert_eq!(config.doc_patterns, vec!["docs/**/*.md", "docs/**/*.mdx"]);
        assert_eq!(config.watch.debounce_ms, 400);
        assert_eq!(config.propagation.strategies.len(), 4);
    }

    #[test]
    fn test_language_for_path() {
        let config = Config::default();
        assert_eq!(config.language_for_path(Path::new("lib/calc.py")), "python");
        assert_eq!(config.language_for_path(Path::new("src/main.rs")), "rust");
        assert_eq!(config.language_for_path(Path::new("notes.unknown")), "python");
        assert_eq!(config.language_for_path(Path::new("Makefile")), "python");
    }

    #[test]
    fn test_find_language_custom() {
        let mut config = Config::default();
        config
            .languages
            .push(Language::new("starlark").with_identifiers(vec!["bzl".to_string()]));

        assert_eq!(config.language_for_path(Path::new("BUILD.bzl")), "starlark");
    }

    #[test]
    fn test_library_name() {
        let mut config = Config::default();
        assert_eq!(config.library_name(), "code_library");

        config.library_dir = PathBuf::from("vendor/snippets");
        assert_eq!(config.library_name(), "snippets");
    }

    #[test]
    fn test_is_source_file() {
        let config = Config::default();
        assert!(config.is_source_file(Path::new("/x/code_library/a.py")));
        assert!(!config.is_source_file(Path::new("/x/code_library/a.pyc")));
        assert!(!config.is_source_file(Path::new("/x/code_library/README")));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.library_dir, config.library_dir);
        assert_eq!(parsed.propagation.strategies, config.propagation.strategies);
    }
}
