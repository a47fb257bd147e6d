//! Rendering of a finding list against the text it was computed from.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::typo::Typo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFinding<'a> {
    line: usize,
    column: usize,
    start: usize,
    end: usize,
    excerpt: &'a str,
    rule: &'a str,
    dictionary_based: bool,
    language: &'static str,
    suggestions: &'a [String],
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    total_findings: usize,
    findings: Vec<JsonFinding<'a>>,
}

/// Render `findings` (with offsets into `text`) in the requested format.
pub fn render(text: &str, findings: &[Typo], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(text, findings)),
        ReportFormat::Json => render_json(text, findings),
    }
}

fn render_text(text: &str, findings: &[Typo]) -> String {
    let mut out = String::new();
    for typo in findings {
        let (line, column) = line_col(text, typo.span.start);
        let excerpt = text.get(typo.span.start..typo.span.end).unwrap_or_default();
        out.push_str(&format!(
            "  {}:{} {} [{}]\n",
            line, column, excerpt, typo.rule.id
        ));
        if !typo.suggestions.is_empty() {
            out.push_str(&format!("    → {}\n", typo.suggestions.join(", ")));
        }
    }
    out
}

fn render_json(text: &str, findings: &[Typo]) -> Result<String> {
    let json_findings: Vec<JsonFinding> = findings
        .iter()
        .map(|t| {
            let (line, column) = line_col(text, t.span.start);
            JsonFinding {
                line,
                column,
                start: t.span.start,
                end: t.span.end,
                excerpt: text.get(t.span.start..t.span.end).unwrap_or_default(),
                rule: &t.rule.id,
                dictionary_based: t.rule.dictionary_based,
                language: t.lang.code(),
                suggestions: &t.suggestions,
            }
        })
        .collect();

    let report = JsonReport {
        total_findings: json_findings.len(),
        findings: json_findings,
    };

    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}

/// 1-based line and column of a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let prefix = &text[..offset.min(text.len())];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start + 1)
}
