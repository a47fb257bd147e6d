//! Recursive, offset-preserving segmentation driving the per-fragment
//! analysis.
//!
//! The segmenter splits text on a priority-ordered list of separators,
//! escalating to a finer separator only when a fragment still exceeds the size
//! ceiling, and accepts oversized fragments once separators run out. Every
//! finding coming back from a sub-fragment is shifted by that fragment's start
//! offset, so the result of the top-level call is always in original-text
//! coordinates.

mod fragment;
pub mod segment;

use log::debug;

use crate::cancel::{CancelCheck, Cancelled, NeverCancelled};
use crate::config::{AnalyzerOptions, ConfigProvider, ConfigSnapshot};
use crate::engine::{EngineRegistry, LanguageDetector, Spellchecker};
use crate::typo::Typo;
use segment::{is_blank, split_with_ranges, word_count};

/// Orchestrates grammar checking over arbitrarily long text.
///
/// Owns no analysis logic of its own: language detection, grammar rules, and
/// word-level spellchecking are injected collaborators. The checker holds no
/// mutable state, so one instance may serve concurrent `analyze` calls from
/// separate threads.
pub struct GrammarChecker {
    engines: EngineRegistry,
    detector: Box<dyn LanguageDetector>,
    spellchecker: Box<dyn Spellchecker>,
    config: Box<dyn ConfigProvider>,
    options: AnalyzerOptions,
}

impl GrammarChecker {
    pub fn new(
        engines: EngineRegistry,
        detector: impl LanguageDetector + 'static,
        spellchecker: impl Spellchecker + 'static,
        config: impl ConfigProvider + 'static,
    ) -> Self {
        Self {
            engines,
            detector: Box::new(detector),
            spellchecker: Box::new(spellchecker),
            config: Box::new(config),
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze `text` with the configured separators and no cancellation.
    ///
    /// Returned findings carry byte offsets into `text`. `Err(Cancelled)` is
    /// unreachable here but kept in the signature so both entry points share
    /// one contract.
    pub fn analyze(&self, text: &str) -> Result<Vec<Typo>, Cancelled> {
        self.analyze_with(text, &self.options.separators, &NeverCancelled)
    }

    /// Analyze with caller-supplied separators and a cancellation checkpoint.
    ///
    /// A cancelled call returns `Err(Cancelled)` and no partial findings;
    /// "analysis not completed" is distinguishable from "nothing found".
    pub fn analyze_with(
        &self,
        text: &str,
        separators: &[char],
        cancel: &dyn CancelCheck,
    ) -> Result<Vec<Typo>, Cancelled> {
        // One snapshot per top-level call; the entire recursion sees the same
        // configuration no matter what the provider does meanwhile.
        let config = self.config.snapshot();
        self.segment(text, separators, &config, cancel)
    }

    fn segment(
        &self,
        text: &str,
        separators: &[char],
        config: &ConfigSnapshot,
        cancel: &dyn CancelCheck,
    ) -> Result<Vec<Typo>, Cancelled> {
        if is_blank(text) {
            return Ok(Vec::new());
        }

        // Grammar rules need context; short inputs get spelling-only
        // treatment to avoid short-phrase false positives.
        if word_count(text) < self.options.min_words {
            return Ok(self.spellchecker.check(text));
        }

        let Some((&sep, rest)) = separators.split_first() else {
            // No finer splitting possible; check the whole string as a leaf.
            return self.analyze_fragment(text, config, cancel);
        };

        let segments = split_with_ranges(text, sep);
        debug!(
            "split {} bytes on {:?} into {} segments",
            text.len(),
            sep,
            segments.len()
        );

        let mut findings = Vec::new();
        for (span, segment) in segments {
            let local = if segment.len() > self.options.max_fragment_len && !rest.is_empty() {
                self.segment(segment, rest, config, cancel)?
            } else {
                // Also the degraded case: still oversized but out of
                // separators, so the performance cost is accepted.
                self.analyze_fragment(segment, config, cancel)?
            };
            findings.extend(local.into_iter().map(|t| t.shifted(span.start)));
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::cancel::CancelFlag;
    use crate::engine::{EngineError, GrammarEngine, RawMatch};
    use crate::lang::Language;
    use crate::typo::{RuleInfo, Span};

    struct EnglishDetector;

    impl LanguageDetector for EnglishDetector {
        fn detect(&self, _text: &str, allowed: &[Language]) -> Option<Language> {
            allowed
                .contains(&Language::English)
                .then_some(Language::English)
        }
    }

    /// Flags every word not present in its word list, with local offsets.
    struct WordListSpeller(&'static [&'static str]);

    impl Spellchecker for WordListSpeller {
        fn check(&self, text: &str) -> Vec<Typo> {
            let mut out = Vec::new();
            let mut start = None;
            for (i, c) in text.char_indices() {
                if c.is_whitespace() {
                    if let Some(s) = start.take() {
                        self.flag_if_unknown(&text[s..i], s, &mut out);
                    }
                } else if start.is_none() {
                    start = Some(i);
                }
            }
            if let Some(s) = start {
                self.flag_if_unknown(&text[s..], s, &mut out);
            }
            out
        }
    }

    impl WordListSpeller {
        fn flag_if_unknown(&self, word: &str, start: usize, out: &mut Vec<Typo>) {
            if !self.0.contains(&word) {
                out.push(Typo {
                    span: Span::new(start, start + word.len()),
                    rule: RuleInfo::new("HUNSPELL", true),
                    suggestions: vec![],
                    lang: Language::English,
                });
            }
        }
    }

    /// Reports every occurrence of each configured pattern, with local
    /// offsets, and counts its invocations.
    struct PatternEngine {
        patterns: Vec<(&'static str, RuleInfo)>,
        calls: Arc<AtomicUsize>,
    }

    impl PatternEngine {
        fn new(patterns: Vec<(&'static str, RuleInfo)>) -> Self {
            Self {
                patterns,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl GrammarEngine for PatternEngine {
        fn check(&self, text: &str) -> Result<Vec<RawMatch>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut out = Vec::new();
            for (pattern, rule) in &self.patterns {
                for (start, matched) in text.match_indices(pattern) {
                    out.push(RawMatch {
                        span: Span::new(start, start + matched.len()),
                        rule: rule.clone(),
                        suggestions: vec![],
                    });
                }
            }
            Ok(out)
        }
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl ConfigProvider for CountingProvider {
        fn snapshot(&self) -> ConfigSnapshot {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ConfigSnapshot::default()
        }
    }

    const KNOWN: &[&str] = &["world", "This", "is", "fine", "world.", "fine."];

    fn spelling_rule() -> RuleInfo {
        RuleInfo::new("MORFOLOGIK_RULE_EN_US", true)
    }

    fn style_rule() -> RuleInfo {
        RuleInfo::new("TOO_FINE", false)
    }

    fn checker(engine: PatternEngine) -> GrammarChecker {
        GrammarChecker::new(
            EngineRegistry::new().with_engine(Language::English, engine),
            EnglishDetector,
            WordListSpeller(KNOWN),
            ConfigSnapshot::default(),
        )
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        let c = checker(PatternEngine::new(vec![("x", style_rule())]));
        for text in ["", "   ", "\n\n\t  \n"] {
            assert!(c.analyze(text).unwrap().is_empty());
        }
    }

    #[test]
    fn test_short_input_gets_spelling_only_treatment() {
        let c = checker(PatternEngine::new(vec![("Helo", style_rule())]));
        // Two words: the grammar engine must not run at all.
        let findings = c.analyze("Helo wrld").unwrap();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|t| t.rule.dictionary_based));
        assert_eq!(findings[0].span, Span::new(0, 4));
        assert_eq!(findings[1].span, Span::new(5, 9));
    }

    #[test]
    fn test_leaf_offsets_survive_deep_recursion() {
        // Force splitting all the way down to spaces to exercise the offset
        // composition on every unwind.
        let engine = PatternEngine::new(vec![
            ("Helo", spelling_rule()),
            ("fine", style_rule()),
        ]);
        let c = checker(engine).with_options(AnalyzerOptions {
            max_fragment_len: 10,
            ..Default::default()
        });

        let mut findings = c.analyze("Helo world. This is fine.").unwrap();
        findings.sort_by_key(|t| t.span.start);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].span, Span::new(0, 4));
        assert!(findings[0].rule.dictionary_based);
        assert_eq!(findings[1].span, Span::new(20, 24));
        assert_eq!(findings[1].rule, style_rule());
    }

    #[test]
    fn test_offsets_independent_of_fragmentation() {
        // The same text must produce the same global findings whether it is
        // analyzed as one leaf or split down to single words.
        let text = "Helo world. This is fine.";
        let patterns = vec![("Helo", spelling_rule()), ("fine", style_rule())];

        let whole = checker(PatternEngine::new(patterns.clone()));
        let split = checker(PatternEngine::new(patterns)).with_options(AnalyzerOptions {
            max_fragment_len: 10,
            ..Default::default()
        });

        let mut a = whole.analyze(text).unwrap();
        let mut b = split.analyze(text).unwrap();
        a.sort_by_key(|t| t.span.start);
        b.sort_by_key(|t| t.span.start);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_spans_within_original_text() {
        let engine = PatternEngine::new(vec![("is", style_rule()), ("Helo", spelling_rule())]);
        let c = checker(engine).with_options(AnalyzerOptions {
            max_fragment_len: 8,
            ..Default::default()
        });

        let text = "Helo world. This is fine.\nAnother line, with a clause; and more.";
        for typo in c.analyze(text).unwrap() {
            assert!(typo.span.start <= typo.span.end);
            assert!(typo.span.end <= text.len());
        }
    }

    #[test]
    fn test_oversized_leaf_without_separators_runs_once() {
        let engine = PatternEngine::new(vec![]);
        let calls = engine.calls.clone();
        // Only '.' can split, and the text contains none: a single oversized
        // leaf, analyzed exactly once.
        let c = checker(engine).with_options(AnalyzerOptions {
            max_fragment_len: 8,
            separators: vec!['.'],
            ..Default::default()
        });

        c.analyze("aaaa bbbb cccc dddd").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_separator_list_goes_straight_to_leaf() {
        let engine = PatternEngine::new(vec![("fine", style_rule())]);
        let calls = engine.calls.clone();
        let c = checker(engine);

        let findings = c
            .analyze_with("This is fine. This is fine.", &[], &NeverCancelled)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_cancellation_aborts_top_level_call() {
        let c = checker(PatternEngine::new(vec![("fine", style_rule())]));
        let flag = CancelFlag::new();
        flag.cancel();

        let result = c.analyze_with(
            "Helo world. This is fine.",
            &c.options().separators.clone(),
            &flag,
        );
        assert_eq!(result, Err(Cancelled));
    }

    #[test]
    fn test_snapshot_read_exactly_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = GrammarChecker::new(
            EngineRegistry::new().with_engine(Language::English, PatternEngine::new(vec![])),
            EnglishDetector,
            WordListSpeller(KNOWN),
            CountingProvider {
                calls: calls.clone(),
            },
        )
        .with_options(AnalyzerOptions {
            max_fragment_len: 6,
            ..Default::default()
        });

        c.analyze("Helo world. This is fine. More words follow here.")
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
