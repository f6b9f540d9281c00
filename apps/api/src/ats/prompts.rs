// ATS scoring prompt template.
// The response format below is what `scraper::parse_ats_result` expects back.

use chrono::NaiveDate;

pub const ATS_SCORE_PROMPT: &str = r#"As of today's date: {date}

You are an ATS (Applicant Tracking System) evaluation engine. Your task is to analyze the following resume text and:

1. Give an overall strict ATS score out of 100.
2. Score based on structure, formatting, keyword relevance, action verbs, readability, and standard section titles.
3. Highlight exact issues that caused score deductions.
4. Provide 3-5 actionable suggestions to improve the resume's ATS compatibility.

Do not penalize for future-looking dates (like "2025 – Present") since today is {date}.

Respond in this structured format:

ATS Score: [Your score]/100

Issues Identified:
- [Point 1]
- [Point 2]

Suggestions to Improve:
1. [Actionable tip 1]
2. [Actionable tip 2]

Resume Content:
{resume_text}
"#;

/// Long-form US date, e.g. `October 19, 2026`.
pub fn format_prompt_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Fills the template. The date goes in first so resume text containing
/// `{date}` is never rewritten.
pub fn build_ats_prompt(resume_text: &str, today: NaiveDate) -> String {
    ATS_SCORE_PROMPT
        .replace("{date}", &format_prompt_date(today))
        .replace("{resume_text}", resume_text)
}
