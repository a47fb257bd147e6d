//! Contracts for the external collaborators: the per-language grammar
//! engines, the language detector, and the word-level spellchecker. The
//! orchestrator treats all of them as black boxes.

use std::collections::HashMap;
use thiserror::Error;

use crate::lang::Language;
use crate::typo::{RuleInfo, Span, Typo};

/// One raw match reported by a grammar backend. Offsets are local to the
/// fragment the backend was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub span: Span,
    pub rule: RuleInfo,
    pub suggestions: Vec<String>,
}

/// Why a grammar-engine invocation produced no matches.
///
/// The two variants are deliberately distinct types of trouble: a backend
/// failure is recovered per fragment, while cancellation must unwind the whole
/// analysis and can never be absorbed by the failure-recovery branch.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grammar backend failure: {0}")]
    Backend(String),
    #[error("grammar check cancelled")]
    Cancelled,
}

/// Grammar checker for one language.
pub trait GrammarEngine: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<RawMatch>, EngineError>;
}

/// Identifies the language of a fragment, restricted to the allowed set.
/// `None` means no confident detection and causes a silent skip.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str, allowed: &[Language]) -> Option<Language>;
}

/// Word-level, dictionary-backed spellchecker. Authoritative for spelling;
/// knows no grammar. Findings carry offsets local to `text`.
pub trait Spellchecker: Send + Sync {
    fn check(&self, text: &str) -> Vec<Typo>;
}

/// Injected mapping from language to grammar engine, replacing any ambient
/// global registry. A language without an engine degrades to zero grammar
/// findings for its fragments.
#[derive(Default)]
pub struct EngineRegistry {
    engines: HashMap<Language, Box<dyn GrammarEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, lang: Language, engine: impl GrammarEngine + 'static) -> Self {
        self.engines.insert(lang, Box::new(engine));
        self
    }

    pub fn get(&self, lang: Language) -> Option<&dyn GrammarEngine> {
        self.engines.get(&lang).map(|e| e.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullEngine;

    impl GrammarEngine for NullEngine {
        fn check(&self, _text: &str) -> Result<Vec<RawMatch>, EngineError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = EngineRegistry::new().with_engine(Language::English, NullEngine);
        assert!(registry.get(Language::English).is_some());
        assert!(registry.get(Language::German).is_none());
        assert!(!registry.is_empty());
    }
}
