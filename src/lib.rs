//! Offset-preserving segmentation and orchestration for grammar checking.
//!
//! Splits arbitrarily long text into fragments small enough for a grammar
//! engine, checks each fragment, and recombines the findings with offsets
//! corrected back into the original text. The grammar engine, language
//! detector, and word-level spellchecker are injected collaborators behind
//! the traits in [`engine`].

pub mod cancel;
pub mod checker;
pub mod config;
pub mod engine;
pub mod lang;
pub mod report;
pub mod typo;

pub use cancel::{CancelCheck, CancelFlag, Cancelled, NeverCancelled};
pub use checker::GrammarChecker;
pub use config::{AnalyzerOptions, ConfigProvider, ConfigSnapshot};
pub use engine::{
    EngineError, EngineRegistry, GrammarEngine, LanguageDetector, RawMatch, Spellchecker,
};
pub use lang::Language;
pub use report::ReportFormat;
pub use typo::{RuleInfo, Span, Typo};
