//! Keyword comparison between a parsed resume and a job description.
//!
//! Token mode splits both sides into normalised words. Phrase mode checks an
//! externally supplied keyword list against the whole resume text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ParsedResume;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

const MIN_TOKEN_CHARS: usize = 3;

/// Job keywords split into those the resume covers and those it lacks.
/// In token mode the two lists partition the job's token set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Token mode
// ────────────────────────────────────────────────────────────────────────────

/// Lowercased word tokens of at least three characters, numbers excluded,
/// in order of appearance (duplicates kept).
pub fn tokenize(text: &str) -> Vec<String> {
    NON_WORD
        .replace_all(&text.to_lowercase(), " ")
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
        .collect()
}

/// The text token mode compares against: contact name/email, skills, each
/// job's company/role/bullets, each project's title/bullets, and each
/// education entry's raw text (or school and degree when raw text is absent).
fn token_source(resume: &ParsedResume) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(resume.contact.name.as_deref());
    parts.extend(resume.contact.email.as_deref());

    let skills = resume.skills.join(", ");
    parts.push(&skills);

    for job in &resume.experience {
        parts.extend(job.company.as_deref());
        parts.extend(job.role.as_deref());
        parts.extend(job.bullets.iter().map(String::as_str));
    }
    for project in &resume.projects {
        parts.extend(project.title.as_deref());
        parts.extend(project.bullets.iter().map(String::as_str));
    }
    for entry in &resume.education {
        match entry.raw_text.as_deref() {
            Some(raw) => parts.push(raw),
            None => {
                parts.extend(entry.school.as_deref());
                parts.extend(entry.degree.as_deref());
            }
        }
    }

    parts.join(" ")
}

pub fn match_tokens(resume: &ParsedResume, job_text: &str) -> KeywordMatch {
    let resume_tokens: HashSet<String> = tokenize(&token_source(resume)).into_iter().collect();

    let mut seen = HashSet::new();
    let mut result = KeywordMatch::default();
    for token in tokenize(job_text) {
        if !seen.insert(token.clone()) {
            continue;
        }
        if resume_tokens.contains(&token) {
            result.matched_keywords.push(token);
        } else {
            result.missing_keywords.push(token);
        }
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Phrase mode
// ────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring match of each supplied phrase against the full
/// resume text. Output keeps the caller's casing and order; blank phrases and
/// case-insensitive repeats are dropped.
pub fn match_phrases<S: AsRef<str>>(resume: &ParsedResume, phrases: &[S]) -> KeywordMatch {
    let haystack = resume_to_text(resume).to_lowercase();

    let mut seen = HashSet::new();
    let mut result = KeywordMatch::default();
    for phrase in phrases.iter().map(|p| p.as_ref().trim()) {
        let needle = phrase.to_lowercase();
        if needle.is_empty() || !seen.insert(needle.clone()) {
            continue;
        }
        if haystack.contains(&needle) {
            result.matched_keywords.push(phrase.to_string());
        } else {
            result.missing_keywords.push(phrase.to_string());
        }
    }
    result
}

/// Renders every populated field as plain text, one field or bullet per line,
/// in document order. Used for phrase matching and as optimizer prompt input.
pub fn resume_to_text(resume: &ParsedResume) -> String {
    let mut lines: Vec<String> = Vec::new();
    let contact = &resume.contact;
    lines.extend(contact.name.clone());
    let contact_line: Vec<&str> = [&contact.email, &contact.phone, &contact.location, &contact.linkedin]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect();
    if !contact_line.is_empty() {
        lines.push(contact_line.join(" | "));
    }

    if !resume.education.is_empty() {
        lines.push("EDUCATION".to_string());
        // The raw block also carries coursework and honours the fields miss.
        for entry in &resume.education {
            match &entry.raw_text {
                Some(raw) if !raw.trim().is_empty() => lines.push(raw.clone()),
                _ => {
                    lines.extend(join_present(&[&entry.school, &entry.dates]));
                    lines.extend(join_present(&[&entry.degree]));
                    lines.extend(entry.gpa.as_ref().map(|gpa| format!("GPA: {gpa}")));
                }
            }
        }
    }

    if !resume.experience.is_empty() {
        lines.push("EXPERIENCE".to_string());
        for job in &resume.experience {
            lines.extend(join_present(&[&job.company, &job.location, &job.dates]));
            lines.extend(join_present(&[&job.role, &job.subheader]));
            lines.extend(job.bullets.iter().map(|b| format!("- {b}")));
        }
    }

    if !resume.projects.is_empty() {
        lines.push("PROJECTS".to_string());
        for project in &resume.projects {
            lines.extend(project.title.clone());
            lines.extend(project.bullets.iter().map(|b| format!("- {b}")));
        }
    }

    if !resume.skills.is_empty() {
        lines.push("SKILLS".to_string());
        lines.push(resume.skills.join(", "));
    }

    for (title, text) in &resume.other {
        lines.push(title.clone());
        lines.push(text.clone());
    }

    lines.join("\n")
}

fn join_present(fields: &[&Option<String>]) -> Option<String> {
    let present: Vec<&str> = fields.iter().filter_map(|f| f.as_deref()).collect();
    (!present.is_empty()).then(|| present.join(" | "))
}
