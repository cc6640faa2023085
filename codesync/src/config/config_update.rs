//! Configuration update and merging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config_data::{Config, EmbedConfig, PropagationConfig, WatchConfig};
use super::language::Language;

/// Partial configuration update that can be merged into a Config.
///
/// All fields are optional. Only specified fields will override the base config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub library_dir: Option<PathBuf>,

    #[serde(default)]
    pub docs_dir: Option<PathBuf>,

    #[serde(default)]
    pub doc_patterns: Option<Vec<String>>,

    #[serde(default)]
    pub source_extensions: Option<Vec<String>>,

    #[serde(default)]
    pub root_markers: Option<Vec<String>>,

    #[serde(default)]
    pub languages: Option<Vec<Language>>,

    #[serde(default)]
    pub watch: Option<WatchConfig>,

    #[serde(default)]
    pub embed: Option<EmbedConfig>,

    #[serde(default)]
    pub propagation: Option<PropagationConfig>,
}

impl ConfigUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges this update into a base configuration, returning a new Config.
    ///
    /// Consumes `self` so fields can be moved instead of cloned.
    pub fn merge_into(self, base: &Config) -> Config {
        Config {
            library_dir: self.library_dir.unwrap_or_else(|| base.library_dir.clone()),
            docs_dir: self.docs_dir.unwrap_or_else(|| base.docs_dir.clone()),
            doc_patterns: self
                .doc_patterns
                .unwrap_or_else(|| base.doc_patterns.clone()),
            source_extensions: self
                .source_extensions
                .unwrap_or_else(|| base.source_extensions.clone()),
            root_markers: self
                .root_markers
                .unwrap_or_else(|| base.root_markers.clone()),
            languages: merge_languages(
                &base.languages,
                self.languages.as_deref().unwrap_or(&[]),
            ),
            watch: self.watch.unwrap_or_else(|| base.watch.clone()),
            embed: self.embed.unwrap_or_else(|| base.embed.clone()),
            propagation: self
                .propagation
                .unwrap_or_else(|| base.propagation.clone()),
        }
    }
}

/// Merge language lists, with update languages overriding base languages of the same name.
fn merge_languages(base: &[Language], update: &[Language]) -> Vec<Language> {
    let mut result = base.to_vec();

    for lang in update {
        result.retain(|l| l.name != lang.name);
        result.push(lang.clone());
    }

    result
}

impl From<ConfigUpdate> for Config {
    fn from(update: ConfigUpdate) -> Self {
        update.merge_into(&Config::default())
    }
}
