use std::sync::LazyLock;

use regex::Regex;

use crate::models::ProjectEntry;
use crate::parsing::patterns::{bulletize, strip_bullet_prefix};

/// `Project Name | Tech, Stack`: a short title, a pipe, then text.
static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^|\n]{5,60}\|\s*[A-Za-z]").unwrap());

pub fn extract_projects(text: &str) -> Vec<ProjectEntry> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }

    if !lines.iter().any(|l| TITLE_LINE.is_match(l)) {
        // One project. A leading bullet means there is no title line at all.
        if strip_bullet_prefix(lines[0]).is_some() {
            return vec![ProjectEntry {
                title: None,
                bullets: bulletize(lines),
            }];
        }
        return vec![parse_project(lines)];
    }

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in lines {
        match blocks.last_mut() {
            Some(block) if !TITLE_LINE.is_match(line) => block.push(line),
            _ => blocks.push(vec![line]),
        }
    }

    blocks.into_iter().map(parse_project).collect()
}

fn parse_project(block: Vec<&str>) -> ProjectEntry {
    let title = block
        .first()
        .and_then(|first| first.split('|').next())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    ProjectEntry {
        title,
        bullets: bulletize(block.into_iter().skip(1)),
    }
}
