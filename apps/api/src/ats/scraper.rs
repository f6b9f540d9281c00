//! Result scraper — recovers score, issues and suggestions from the model's
//! free-text reply.
//!
//! Best effort by construction. Lines are matched by ordered prefix checks;
//! anything unrecognised (wrapped descriptions, alternative bullet styles,
//! items outside their section) is dropped. Total mismatch yields score 0 and
//! empty lists, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::analysis::{AnalysisItem, ParsedAnalysis};

const SCORE_SENTINEL: &str = "ATS Score:";
const ISSUES_SENTINEL: &str = "Issues Identified:";
const SUGGESTIONS_SENTINEL: &str = "Suggestions to Improve:";
const ISSUE_BULLET: &str = "- **";

static SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)/100").unwrap());
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.").unwrap());

// Description cleanup: strip "<marker> **Title**: " if present, otherwise
// unwrap "<marker> **Title**" to "Title". The issue unwrap is unanchored.
static ISSUE_TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \*\*(.*?)\*\*: ").unwrap());
static ISSUE_TITLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"- \*\*(.*?)\*\*").unwrap());
static SUGGESTION_TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*\*\*(.*?)\*\*: ").unwrap());
static SUGGESTION_TITLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*\*\*(.*?)\*\*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Issues,
    Suggestions,
}

/// Scrapes a model reply. Pure: the same text always yields the same result.
pub fn parse_ats_result(text: &str) -> ParsedAnalysis {
    let mut analysis = ParsedAnalysis::default();
    let mut section = Section::None;

    for line in text.split('\n') {
        let line = line.trim_matches(is_blank);

        if line.starts_with(SCORE_SENTINEL) {
            if let Some(score) = extract_score(line) {
                analysis.score = score;
            }
        } else if line.starts_with(ISSUES_SENTINEL) {
            section = Section::Issues;
        } else if line.starts_with(SUGGESTIONS_SENTINEL) {
            section = Section::Suggestions;
        } else if line.starts_with(ISSUE_BULLET) && section == Section::Issues {
            analysis
                .issues
                .push(split_item(line, &ISSUE_TITLE_PREFIX, &ISSUE_TITLE_MARKER));
        } else if NUMBERED.is_match(line) && section == Section::Suggestions {
            analysis.suggestions.push(split_item(
                line,
                &SUGGESTION_TITLE_PREFIX,
                &SUGGESTION_TITLE_MARKER,
            ));
        }
    }

    analysis
}

/// Whitespace, counting a stray byte-order mark.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// First `N/100` on the line. Numbers too large for `u32` are ignored.
fn extract_score(line: &str) -> Option<u32> {
    SCORE.captures(line)?.get(1)?.as_str().parse().ok()
}

fn split_item(line: &str, title_prefix: &Regex, title_marker: &Regex) -> AnalysisItem {
    let stripped = title_prefix.replace(line, "");
    let description = title_marker.replace(&stripped, "${1}").into_owned();
    let title = BOLD_SPAN
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    AnalysisItem { title, description }
}
