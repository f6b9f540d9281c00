//! Presentation summary of a scraped analysis: score band, star rating and
//! gauge geometry, plus a plain-text rendering for the terminal.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::models::analysis::{AnalysisItem, ParsedAnalysis};

/// Radius of the circular score gauge, in viewBox units.
pub const GAUGE_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Excellent,
    Good,
    NeedsWork,
}

impl ScoreCategory {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => ScoreCategory::Excellent,
            s if s >= 60 => ScoreCategory::Good,
            _ => ScoreCategory::NeedsWork,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Excellent",
            ScoreCategory::Good => "Good",
            ScoreCategory::NeedsWork => "Needs Work",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Your resume is well-optimized for ATS systems!",
            ScoreCategory::Good => "Good foundation, but room for improvement.",
            ScoreCategory::NeedsWork => "Focus on the suggestions below to boost your score.",
        }
    }
}

/// Score on a five-star scale, rounded to one decimal.
pub fn star_rating(score: u32) -> f64 {
    (score as f64 / 100.0 * 5.0 * 10.0).round() / 10.0
}

/// Stroke geometry for the circular gauge: the arc drawn is `score`% of the circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreGauge {
    pub circumference: f64,
    pub dash_offset: f64,
}

impl ScoreGauge {
    pub fn for_score(score: u32) -> Self {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        Self {
            circumference,
            dash_offset: circumference - (score as f64 / 100.0) * circumference,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub score: u32,
    pub category: ScoreCategory,
    pub label: &'static str,
    pub message: &'static str,
    pub star_rating: f64,
    pub gauge: ScoreGauge,
    pub issue_count: usize,
    pub suggestion_count: usize,
    pub issues: Vec<AnalysisItem>,
    pub suggestions: Vec<AnalysisItem>,
}

impl AtsReport {
    pub fn from_analysis(analysis: &ParsedAnalysis) -> Self {
        let category = ScoreCategory::from_score(analysis.score);
        Self {
            score: analysis.score,
            category,
            label: category.label(),
            message: category.message(),
            star_rating: star_rating(analysis.score),
            gauge: ScoreGauge::for_score(analysis.score),
            issue_count: analysis.issues.len(),
            suggestion_count: analysis.suggestions.len(),
            issues: analysis.issues.clone(),
            suggestions: analysis.suggestions.clone(),
        }
    }
}

impl fmt::Display for AtsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Resume Scores {}/100 ({})", self.score, self.label)?;
        writeln!(f, "{}", self.message)?;
        writeln!(
            f,
            "Issues Found: {}  Improvements: {}  Star Rating: {}",
            self.issue_count, self.suggestion_count, self.star_rating
        )?;

        write_items(f, "Issues to Fix", &self.issues)?;
        write_items(f, "Recommended Actions", &self.suggestions)
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, heading: &str, items: &[AnalysisItem]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{heading}")?;
    for (index, item) in items.iter().enumerate() {
        if item.title.is_empty() {
            writeln!(f, "  {}. {}", index + 1, item.description)?;
        } else {
            writeln!(f, "  {}. {}", index + 1, item.title)?;
            writeln!(f, "     {}", item.description)?;
        }
    }
    Ok(())
}
