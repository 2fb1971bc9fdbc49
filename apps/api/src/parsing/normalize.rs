//! Markup → plain text. Paragraph and list-item boundaries become newlines;
//! tabs survive because the experience extractor keys off them.

use std::sync::LazyLock;

use regex::Regex;

static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|li|h[1-6]|div|tr|ul|ol|table)\s*>").unwrap()
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \u{00A0}]+").unwrap());

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Decodes the fixed entity set. `&amp;` goes last so `&amp;lt;` yields `&lt;`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn normalize_text(markup: &str) -> String {
    let text = BREAK_TAG.replace_all(markup, "\n");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text).replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| SPACE_RUN.replace_all(line, " ").trim().to_string())
        .collect();

    BLANK_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// The first `n` non-empty lines of already-normalised text.
pub fn first_lines(text: &str, n: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(n)
        .collect::<Vec<_>>()
        .join("\n")
}
