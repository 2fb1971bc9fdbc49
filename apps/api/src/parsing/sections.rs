//! Section segmentation.
//!
//! Two independent strategies produce titled sections:
//! 1. markup headings: heading-like `<h*>` / `<p>` blocks whose text is a known
//!    section name or an all-caps line;
//! 2. heading lines: plain-text lines from a fixed uppercase vocabulary.
//!
//! Strategy 2 replaces strategy 1 when the latter finds nothing, and backfills
//! education/experience/skills when strategy 1 leaves them empty.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parsing::normalize::normalize_text;

const MAX_HEADING_CHARS: usize = 80;
/// All-caps headings need at least this many letters so acronyms such as
/// `AWS` standing alone in a paragraph are not promoted.
const MIN_UPPERCASE_HEADING_LETTERS: usize = 4;

const BACKFILL_KINDS: [SectionKind; 3] = [
    SectionKind::Education,
    SectionKind::Experience,
    SectionKind::Skills,
];

static MARKUP_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(h[1-6]|p|li)\b[^>]*>(.*?)</(?:h[1-6]|p|li)\s*>").unwrap()
});

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:EDUCATION|EXPERIENCE|PROFESSIONAL EXPERIENCE|WORK EXPERIENCE|PROJECTS|PROJECTS & OUTSIDE EXPERIENCE|SKILLS|TECHNICAL SKILLS|CONTACT)\s*:?$",
    )
    .unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Contact,
    Education,
    Experience,
    Projects,
    Skills,
}

/// Maps a candidate title onto the known vocabulary after lowercase and
/// whitespace normalisation.
pub fn classify_title(title: &str) -> Option<SectionKind> {
    let normalized = WHITESPACE
        .replace_all(title.trim().trim_end_matches(':'), " ")
        .to_lowercase();
    match normalized.trim() {
        "contact" => Some(SectionKind::Contact),
        "education" => Some(SectionKind::Education),
        "experience" | "professional experience" | "work experience" => {
            Some(SectionKind::Experience)
        }
        "projects" | "projects & outside experience" => Some(SectionKind::Projects),
        "skills" | "technical skills" => Some(SectionKind::Skills),
        _ => None,
    }
}

fn is_uppercase_heading(text: &str) -> bool {
    let letters = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    letters >= MIN_UPPERCASE_HEADING_LETTERS
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == ' ' || c == '&')
}

pub fn is_heading_candidate(text: &str) -> bool {
    text.chars().count() < MAX_HEADING_CHARS
        && (classify_title(text).is_some() || is_uppercase_heading(text))
}

/// Section texts keyed by kind, plus unrecognised sections by title.
#[derive(Debug, Default, Clone)]
pub struct Segments {
    /// Text before the first accepted heading.
    pub preamble: String,
    known: HashMap<SectionKind, String>,
    pub other: BTreeMap<String, String>,
    /// Number of headings accepted by the strategy that built this value.
    pub headings_found: usize,
}

impl Segments {
    fn push(&mut self, title: &str, content: String) {
        self.headings_found += 1;
        let slot = match classify_title(title) {
            Some(kind) => self.known.entry(kind).or_default(),
            None => self.other.entry(title.to_string()).or_default(),
        };
        if !slot.is_empty() && !content.is_empty() {
            slot.push('\n');
        }
        slot.push_str(&content);
    }

    pub fn get(&self, kind: SectionKind) -> &str {
        self.known.get(&kind).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self, kind: SectionKind) -> bool {
        self.get(kind).trim().is_empty()
    }

    /// Copies `kind` from `source` only when this value has nothing for it.
    fn fill_if_blank(&mut self, kind: SectionKind, source: &Segments) {
        if self.is_blank(kind) && !source.is_blank(kind) {
            self.known.insert(kind, source.get(kind).to_string());
        }
    }
}

/// Strategy 1: find heading-like `<h*>` / `<p>` blocks in the original markup.
/// Everything between two accepted headings, whatever its tags, is that
/// section's content. `<li>` blocks never open a section.
pub fn split_by_markup_headings(markup: &str) -> Segments {
    let headings: Vec<(usize, usize, String)> = MARKUP_BLOCK
        .captures_iter(markup)
        .filter_map(|caps| {
            let block = caps.get(0)?;
            if caps[1].eq_ignore_ascii_case("li") {
                return None;
            }
            let text = normalize_text(&caps[2]);
            is_heading_candidate(&text).then(|| (block.start(), block.end(), text))
        })
        .collect();

    let mut segments = Segments::default();
    let preamble_end = headings.first().map_or(markup.len(), |(start, _, _)| *start);
    segments.preamble = section_text(&markup[..preamble_end]);

    for (i, (_, end, title)) in headings.iter().enumerate() {
        let next = headings.get(i + 1).map_or(markup.len(), |(start, _, _)| *start);
        segments.push(title, section_text(&markup[*end..next]));
    }
    segments
}

/// Normalised text of a markup slice with blank lines dropped.
fn section_text(markup: &str) -> String {
    normalize_text(markup)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strategy 2: scan normalised plain text for fixed uppercase heading lines.
pub fn split_by_heading_lines(plain: &str) -> Segments {
    let mut segments = Segments::default();
    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in plain.lines() {
        let trimmed = line.trim();
        if HEADING_LINE.is_match(trimmed) {
            if let Some((title, lines)) = current.take() {
                segments.push(title, lines.join("\n").trim().to_string());
            }
            current = Some((trimmed.trim_end_matches(':').trim(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        } else {
            preamble.push(line);
        }
    }

    if let Some((title, lines)) = current {
        segments.push(title, lines.join("\n").trim().to_string());
    }
    segments.preamble = preamble.join("\n").trim().to_string();
    segments
}

/// Runs strategy 1, falls back to strategy 2 wholesale when it finds no
/// heading, and otherwise backfills the empty education/experience/skills
/// sections from strategy 2 without overwriting anything already found.
pub fn segment(markup: &str, plain: &str) -> Segments {
    let by_markup = split_by_markup_headings(markup);
    if by_markup.headings_found == 0 {
        debug!("No markup headings found, using heading-line strategy");
        return split_by_heading_lines(plain);
    }

    let mut segments = by_markup;
    let blank: Vec<SectionKind> = BACKFILL_KINDS
        .into_iter()
        .filter(|kind| segments.is_blank(*kind))
        .collect();

    if !blank.is_empty() {
        debug!(?blank, "Backfilling empty sections from heading lines");
        let by_lines = split_by_heading_lines(plain);
        for kind in blank {
            segments.fill_if_blank(kind, &by_lines);
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_title_normalizes_case_and_whitespace() {
        assert_eq!(
            classify_title("  Professional   Experience "),
            Some(SectionKind::Experience)
        );
        assert_eq!(
            classify_title("PROJECTS & OUTSIDE EXPERIENCE"),
            Some(SectionKind::Projects)
        );
        assert_eq!(classify_title("Technical Skills:"), Some(SectionKind::Skills));
        assert_eq!(classify_title("Hobbies"), None);
    }

    #[test]
    fn test_heading_candidate_rules() {
        assert!(is_heading_candidate("Education"));
        assert!(is_heading_candidate("AWARDS & HONORS"));
        assert!(!is_heading_candidate("AWS"));
        assert!(!is_heading_candidate("Built backend services"));
        assert!(!is_heading_candidate(&"A".repeat(90)));
    }

    #[test]
    fn test_markup_strategy_groups_content_under_headings() {
        let html = "<p>Jane Doe</p><p>jane@example.com</p>\
            <h2>Education</h2><p>MIT</p>\
            <p><strong>SKILLS</strong></p><p>Rust, Go</p><li>Python</li>\
            <h2>VOLUNTEERING</h2><p>Food bank</p>";
        let segments = split_by_markup_headings(html);

        assert_eq!(segments.headings_found, 3);
        assert_eq!(segments.preamble, "Jane Doe\njane@example.com");
        assert_eq!(segments.get(SectionKind::Education), "MIT");
        assert_eq!(segments.get(SectionKind::Skills), "Rust, Go\nPython");
        assert_eq!(segments.other.get("VOLUNTEERING").unwrap(), "Food bank");
    }

    #[test]
    fn test_markup_strategy_keeps_content_outside_paragraphs() {
        let html = "<div>Jane Doe</div>\
            <h2>Skills</h2><div>Rust, Go</div>\
            <h2>Experience</h2>Acme Corp\tJan 2020 – Present<br>• Built APIs";
        let segments = split_by_markup_headings(html);

        assert_eq!(segments.headings_found, 2);
        assert_eq!(segments.preamble, "Jane Doe");
        assert_eq!(segments.get(SectionKind::Skills), "Rust, Go");
        assert_eq!(
            segments.get(SectionKind::Experience),
            "Acme Corp\tJan 2020 – Present\n• Built APIs"
        );
    }

    #[test]
    fn test_list_items_never_open_a_section() {
        let html = "<h2>Skills</h2><li>SKILLS MATRIX</li>";
        let segments = split_by_markup_headings(html);
        assert_eq!(segments.headings_found, 1);
        assert_eq!(segments.get(SectionKind::Skills), "SKILLS MATRIX");
    }

    #[test]
    fn test_heading_line_strategy() {
        let plain = "Jane Doe\nEDUCATION\nMIT\nEXPERIENCE:\nAcme\nSKILLS\nRust";
        let segments = split_by_heading_lines(plain);
        assert_eq!(segments.preamble, "Jane Doe");
        assert_eq!(segments.get(SectionKind::Education), "MIT");
        assert_eq!(segments.get(SectionKind::Experience), "Acme");
        assert_eq!(segments.get(SectionKind::Skills), "Rust");
    }

    #[test]
    fn test_segment_falls_back_when_markup_has_no_headings() {
        let plain = "Jane Doe\nSKILLS\nRust, Go";
        let segments = segment(plain, plain);
        assert_eq!(segments.get(SectionKind::Skills), "Rust, Go");
    }

    #[test]
    fn test_segment_backfills_only_empty_sections() {
        let html = "<h2>Experience</h2><p>Acme Corp</p>\
            <p>EDUCATION</p>";
        let plain = "EXPERIENCE\nSomething else\nEDUCATION\nMIT\nSKILLS\nRust";
        let segments = segment(html, plain);

        // Experience came from markup and is kept.
        assert_eq!(segments.get(SectionKind::Experience), "Acme Corp");
        // Education heading existed in markup but was empty.
        assert_eq!(segments.get(SectionKind::Education), "MIT");
        assert_eq!(segments.get(SectionKind::Skills), "Rust");
    }
}
