use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::lang::Language;

/// Immutable view of the user-facing settings, captured exactly once at the
/// start of a top-level analysis and threaded through the whole recursion.
///
/// Reading the settings once per call guarantees a single document analysis
/// sees one consistent configuration even if the settings source mutates
/// concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Languages the detector may report; fragments in any other language are
    /// silently skipped.
    pub enabled_languages: Vec<Language>,
    /// When false, dictionary-based spelling findings from the grammar engine
    /// are discarded.
    pub enabled_spellcheck: bool,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            enabled_languages: vec![Language::English],
            enabled_spellcheck: true,
        }
    }
}

/// Source of configuration snapshots. Called exactly once per top-level
/// `analyze`; implementations are free to read from mutable shared state.
pub trait ConfigProvider: Send + Sync {
    fn snapshot(&self) -> ConfigSnapshot;
}

/// A fixed configuration is its own provider.
impl ConfigProvider for ConfigSnapshot {
    fn snapshot(&self) -> ConfigSnapshot {
        self.clone()
    }
}

/// Segmentation policy knobs.
///
/// The canonical values are not derived from anything measurable, so they are
/// kept configurable rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    /// Fragments longer than this (in bytes) are split further while
    /// separators remain.
    #[serde(default = "default_max_fragment_len")]
    pub max_fragment_len: usize,

    /// Fragments shorter than this are skipped entirely.
    #[serde(default = "default_min_fragment_len")]
    pub min_fragment_len: usize,

    /// Inputs with fewer whitespace-separated words than this get
    /// spelling-only treatment, never grammar checking.
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Split characters in decreasing granularity, tried coarse to fine.
    #[serde(default = "default_separators")]
    pub separators: Vec<char>,
}

fn default_max_fragment_len() -> usize {
    10_000
}

fn default_min_fragment_len() -> usize {
    2
}

fn default_min_words() -> usize {
    3
}

fn default_separators() -> Vec<char> {
    vec!['\n', '?', '!', '.', ';', ',', ' ', '\t']
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_fragment_len: default_max_fragment_len(),
            min_fragment_len: default_min_fragment_len(),
            min_words: default_min_words(),
            separators: default_separators(),
        }
    }
}

impl AnalyzerOptions {
    /// Load options from a TOML file. Missing keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse options file: {}", path.display()))
    }
}
