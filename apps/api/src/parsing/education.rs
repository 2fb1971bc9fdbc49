use std::sync::LazyLock;

use regex::Regex;

use crate::models::EducationEntry;
use crate::parsing::patterns::{find_any_date, is_date_range};

static INSTITUTION_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:University|College|Institute|School)\b").unwrap());

static DEGREE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(?:Bachelor|Master|PhD|Ph\.D)|\b[BM]\.[SA]\.)").unwrap()
});

static GPA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bGPA\s*:?\s*([0-9](?:\.[0-9]{1,2})?)").unwrap()
});

static GPA_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^GPA\b").unwrap());

static GPA_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s*\|\s*GPA.*$").unwrap());

static DEGREE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Bachelor|Master)(?:'s|’s)?(?:[ ]+of[ ]+[A-Z][A-Za-z]*(?:[ ]+[A-Z][A-Za-z]*)*)?|\bPh\.?D\.?|\b[BM]\.[SA]\.",
    )
    .unwrap()
});

static DEGREE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ ]+in[ ]+((?:[A-Z][A-Za-z]*|and|&)(?:[ ]+(?:[A-Z][A-Za-z]*|and|&))*)").unwrap()
});

static UNIVERSITY_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bUniversity of [A-Z][A-Za-z]*(?:[ ]+(?:at[ ]+)?[A-Z][A-Za-z]*)*").unwrap()
});

static NAMED_INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z.&'-]*[ ]+)+(?:University|College|Institute(?:[ ]+of[ ]+Technology)?)\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeywordLine {
    Institution,
    Degree,
    Both,
}

impl KeywordLine {
    fn classify(line: &str) -> Option<Self> {
        if !line.chars().next().is_some_and(char::is_uppercase) {
            return None;
        }
        match (
            INSTITUTION_KEYWORD.is_match(line),
            DEGREE_KEYWORD.is_match(line),
        ) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Institution),
            (false, true) => Some(Self::Degree),
            (false, false) => None,
        }
    }

    fn overlaps(self, other: Self) -> bool {
        self == other || self == Self::Both || other == Self::Both
    }
}

/// Splits the section at capitalised institution/degree lines. A keyword line
/// opens a new block only once the current block already has a line of the
/// same kind, so a school line and its degree line stay together. Blocks
/// without any keyword line are dropped.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<(Vec<&str>, Vec<KeywordLine>)> = Vec::new();
    let mut current: (Vec<&str>, Vec<KeywordLine>) = (Vec::new(), Vec::new());

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let kind = KeywordLine::classify(line);
        if let Some(kind) = kind {
            if current.1.iter().any(|seen| seen.overlaps(kind)) {
                blocks.push(std::mem::take(&mut current));
            }
            current.1.push(kind);
        }
        current.0.push(line);
    }
    blocks.push(current);

    blocks
        .into_iter()
        .filter(|(_, kinds)| !kinds.is_empty())
        .map(|(lines, _)| lines.join("\n"))
        .collect()
}

pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let blocks = split_blocks(text);
    if blocks.is_empty() {
        return vec![EducationEntry {
            raw_text: Some(text.to_string()),
            ..Default::default()
        }];
    }

    blocks.iter().map(|block| parse_block(block)).collect()
}

fn parse_block(block: &str) -> EducationEntry {
    EducationEntry {
        school: find_school(block),
        degree: find_degree(block),
        dates: find_any_date(block),
        gpa: GPA.captures(block).map(|caps| caps[1].to_string()),
        raw_text: Some(block.to_string()),
    }
}

fn find_degree(block: &str) -> Option<String> {
    let m = DEGREE_PHRASE.find(block)?;
    let mut degree = m.as_str().trim().to_string();
    if let Some(caps) = DEGREE_FIELD.captures(&block[m.end()..]) {
        let field = caps[1].trim_end_matches(" GPA").trim();
        if !field.is_empty() {
            degree = format!("{degree} in {field}");
        }
    }
    Some(degree)
}

/// `University of X`, then `X University/College/Institute`, then the first line.
fn find_school(block: &str) -> Option<String> {
    [&*UNIVERSITY_OF, &*NAMED_INSTITUTION]
        .iter()
        .find_map(|re| re.find(block))
        .map(|m| strip_gpa_suffix(m.as_str()))
        .or_else(|| first_line_school(block))
}

fn strip_gpa_suffix(text: &str) -> String {
    GPA_SUFFIX.replace(text, "").trim().to_string()
}

fn first_line_school(block: &str) -> Option<String> {
    let first = block.lines().next()?.trim();
    if is_date_range(first) || GPA_LINE.is_match(first) || DEGREE_KEYWORD.is_match(first) {
        return None;
    }
    let head = first.split('\t').next().unwrap_or(first);
    let school = strip_gpa_suffix(head);
    (!school.is_empty()).then_some(school)
}
