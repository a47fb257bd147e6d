//! Leaf analysis of a single fragment. No offset responsibility here: all
//! findings are local to the fragment and get shifted by the caller.

use log::{debug, trace, warn};
use std::collections::HashSet;

use super::segment::WHITESPACE;
use super::GrammarChecker;
use crate::cancel::{CancelCheck, Cancelled};
use crate::config::ConfigSnapshot;
use crate::engine::EngineError;
use crate::typo::Typo;

impl GrammarChecker {
    /// Run language detection, the grammar engine, and spelling
    /// cross-validation on one fragment that is small enough (or is a
    /// recursion leaf).
    pub(crate) fn analyze_fragment(
        &self,
        fragment: &str,
        config: &ConfigSnapshot,
        cancel: &dyn CancelCheck,
    ) -> Result<Vec<Typo>, Cancelled> {
        if fragment.len() < self.options.min_fragment_len {
            trace!("fragment of {} bytes below minimum, skipping", fragment.len());
            return Ok(Vec::new());
        }

        let Some(lang) = self
            .detector
            .detect(fragment, &config.enabled_languages)
        else {
            debug!("no confident language for fragment, skipping");
            return Ok(Vec::new());
        };

        let raw = match self.engines.get(lang) {
            Some(engine) => match engine.check(fragment) {
                Ok(matches) => matches,
                // A broken backend costs this fragment its findings, nothing
                // more; siblings keep going.
                Err(EngineError::Backend(err)) => {
                    warn!("grammar backend failed for {}: {}", lang, err);
                    Vec::new()
                }
                // Cancellation is not a tool failure and must unwind.
                Err(EngineError::Cancelled) => return Err(Cancelled),
            },
            None => {
                warn!("no grammar engine registered for {}", lang);
                Vec::new()
            }
        };

        cancel.poll()?;

        // Identical raw matches collapse; first occurrence wins.
        let mut seen = HashSet::new();
        let mut typos = Vec::new();
        for m in raw {
            let typo = Typo {
                span: m.span,
                rule: m.rule,
                suggestions: m.suggestions,
                lang,
            };
            if seen.insert(typo.clone()) {
                typos.push(typo);
            }
        }

        let (spelling, others): (Vec<Typo>, Vec<Typo>) =
            typos.into_iter().partition(|t| t.rule.dictionary_based);

        // Second opinion for English spelling findings: the phrase-context
        // matcher is only believed if the word-level dictionary also objects
        // to at least one word of the flagged substring.
        let verified: Vec<Typo> = spelling
            .into_iter()
            .filter(|t| {
                if !lang.is_english() {
                    return true;
                }
                let flagged = fragment.get(t.span.start..t.span.end).unwrap_or_default();
                self.misspelling_confirmed(flagged)
            })
            .collect();

        let mut findings = others;
        if config.enabled_spellcheck {
            findings.extend(verified);
        }
        Ok(findings)
    }

    fn misspelling_confirmed(&self, flagged: &str) -> bool {
        WHITESPACE
            .split(flagged)
            .filter(|word| !word.is_empty())
            .any(|word| !self.spellchecker.check(word).is_empty())
    }
}
