use serde::Serialize;

use crate::lang::Language;

/// Half-open `[start, end)` byte-offset interval into a piece of text.
///
/// Spans are local to whatever fragment they were computed against until the
/// segmentation recursion unwinds; `shifted` composes a fragment-local span
/// back into the enclosing text's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The same interval moved `offset` bytes to the right.
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Identity of the rule that produced a finding.
///
/// `dictionary_based` marks word-spelling rules, which are subject to
/// cross-validation and to the global spellcheck toggle; everything else is
/// treated as a grammar finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuleInfo {
    pub id: String,
    pub dictionary_based: bool,
}

impl RuleInfo {
    pub fn new(id: impl Into<String>, dictionary_based: bool) -> Self {
        Self {
            id: id.into(),
            dictionary_based,
        }
    }
}

/// A single finding: the flagged span, the rule that fired, replacement
/// suggestions in preference order, and the language the text was checked
/// under.
///
/// Typos are value objects; equality is structural over all four fields and is
/// what deduplication uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Typo {
    pub span: Span,
    pub rule: RuleInfo,
    pub suggestions: Vec<String>,
    pub lang: Language,
}

impl Typo {
    /// The same finding with its span moved into an enclosing coordinate
    /// space.
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            span: self.span.shifted(offset),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_shift() {
        let span = Span::new(3, 8);
        assert_eq!(span.shifted(12), Span::new(15, 20));
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_typo_shift_keeps_everything_else() {
        let typo = Typo {
            span: Span::new(0, 4),
            rule: RuleInfo::new("MORFOLOGIK_RULE_EN_US", true),
            suggestions: vec!["Hello".to_string()],
            lang: Language::English,
        };

        let shifted = typo.clone().shifted(12);
        assert_eq!(shifted.span, Span::new(12, 16));
        assert_eq!(shifted.rule, typo.rule);
        assert_eq!(shifted.suggestions, typo.suggestions);
        assert_eq!(shifted.lang, typo.lang);
    }

    #[test]
    fn test_structural_equality() {
        let a = Typo {
            span: Span::new(0, 4),
            rule: RuleInfo::new("R1", false),
            suggestions: vec![],
            lang: Language::English,
        };
        let b = a.clone();
        assert_eq!(a, b);

        let c = Typo {
            span: Span::new(1, 4),
            ..a.clone()
        };
        assert_ne!(a, c);
    }
}
