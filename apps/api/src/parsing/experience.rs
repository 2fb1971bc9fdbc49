//! Experience extraction.
//!
//! Job boundaries are recovered with two splitting strategies (tab-separated
//! `Company<TAB>Dates` headers, then short lines followed by a `|` line). The
//! first that yields more than one block wins. Each block's header and a
//! bounded lookahead are mined for company/role/location/dates/subheader;
//! consumed header lines never become bullets.

use crate::models::ExperienceEntry;
use crate::parsing::patterns::{
    bulletize, find_date_range, is_city_line, is_date_range, is_state_line, looks_like_location,
    looks_like_tech, mentions_role, strip_bullet_prefix, DATE_RANGE, TAB_DATE_RANGE,
};

const MAX_COMPANY_CHARS: usize = 50;
const MAX_PIPE_HEADER_CHARS: usize = 45;
const MAX_ROLE_LINE_CHARS: usize = 50;
const MAX_ROLE_LINE_WORDS: usize = 6;
const LOOKAHEAD_LINES: usize = 5;

type Boundary = fn(&[&str], usize) -> bool;

/// `Company<TAB>Month YYYY – Month YYYY`
fn is_tab_date_header(lines: &[&str], i: usize) -> bool {
    TAB_DATE_RANGE.is_match(lines[i])
}

/// A short line directly followed by a line starting with `|`.
fn is_pipe_header(lines: &[&str], i: usize) -> bool {
    lines[i].chars().count() <= MAX_PIPE_HEADER_CHARS
        && lines
            .get(i + 1)
            .is_some_and(|next| next.trim_start().starts_with('|'))
}

/// Splits before every boundary line; lines ahead of the first boundary form
/// their own leading block. `None` when the strategy finds no boundary at all.
fn split_before<'a>(lines: &[&'a str], is_boundary: Boundary) -> Option<Vec<Vec<&'a str>>> {
    let mut found = false;
    let mut blocks: Vec<Vec<&'a str>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();

    for i in 0..lines.len() {
        if is_boundary(lines, i) {
            found = true;
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(lines[i]);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    found.then_some(blocks)
}

fn split_jobs<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let strategies: [Boundary; 2] = [is_tab_date_header, is_pipe_header];
    let mut single_block = None;

    for strategy in strategies {
        if let Some(blocks) = split_before(lines, strategy) {
            if blocks.len() > 1 {
                return blocks;
            }
            single_block.get_or_insert(blocks);
        }
    }
    single_block.unwrap_or_default()
}

pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let blocks = split_jobs(&lines);
    if blocks.is_empty() {
        // No boundary found: one job, headed by its first line, unless the
        // section opens straight into bullets.
        if strip_bullet_prefix(lines[0]).is_none() {
            return vec![parse_job(&lines)];
        }
        let mut bullets = bulletize(lines.iter().copied());
        if bullets.is_empty() {
            bullets.push(text.trim().to_string());
        }
        return vec![ExperienceEntry {
            bullets,
            ..Default::default()
        }];
    }

    blocks.iter().map(|block| parse_job(block)).collect()
}

fn clean(text: &str) -> Option<String> {
    let text = text.trim().trim_matches('|').trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn short_company(text: &str) -> Option<String> {
    clean(text).filter(|c| c.chars().count() < MAX_COMPANY_CHARS)
}

/// A bare role line such as `Senior Software Engineer`.
fn is_role_line(line: &str) -> bool {
    line.chars().count() <= MAX_ROLE_LINE_CHARS
        && line.split_whitespace().count() <= MAX_ROLE_LINE_WORDS
        && !line.ends_with('.')
        && mentions_role(line)
}

#[derive(Default)]
struct Header {
    company: Option<String>,
    role: Option<String>,
    location: Option<String>,
    dates: Option<String>,
    subheader: Option<String>,
}

impl Header {
    /// First line: `pre-tab` part names the company (optionally `| location`),
    /// the post-tab part is consumed as dates.
    fn from_first_line(line: &str) -> Self {
        let mut header = Header::default();

        let pre = match line.split_once('\t') {
            Some((pre, post)) => {
                header.dates = DATE_RANGE.find(post).map(|m| m.as_str().trim().to_string());
                pre.trim()
            }
            None => line,
        };

        match pre.split_once('|') {
            Some((left, right)) if looks_like_location(right) => {
                header.company = short_company(left);
                header.location = clean(right);
            }
            _ => header.company = short_company(pre),
        }
        header
    }

    /// Reads a `|`-separated line. Returns true when a role was found.
    fn absorb_pipe_line(&mut self, line: &str) -> bool {
        let parts: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty() && !is_date_range(p))
            .collect();

        let Some(role_idx) = parts.iter().position(|p| mentions_role(p)) else {
            return false;
        };
        self.role = clean(parts[role_idx]);

        for (idx, part) in parts.iter().enumerate() {
            if idx == role_idx {
                continue;
            }
            if looks_like_location(part) {
                self.location.get_or_insert_with(|| part.to_string());
            } else if looks_like_tech(part) {
                self.subheader.get_or_insert_with(|| part.to_string());
            }
        }
        true
    }

    /// `Role<TAB>Dates` or `Location<TAB>Dates` lines beneath the company line.
    fn absorb_tab_line(&mut self, line: &str) -> bool {
        let Some((pre, _)) = line.split_once('\t') else {
            return false;
        };
        let pre = pre.trim();
        if self.role.is_none() && mentions_role(pre) {
            self.role = clean(pre);
            true
        } else if self.location.is_none() && looks_like_location(pre) {
            self.location = clean(pre);
            true
        } else {
            false
        }
    }
}

fn parse_job(lines: &[&str]) -> ExperienceEntry {
    let mut consumed = vec![false; lines.len()];
    consumed[0] = true;
    let mut header = Header::from_first_line(lines[0]);

    let lookahead_end = lines.len().min(1 + LOOKAHEAD_LINES);
    for idx in 1..lookahead_end {
        let line = lines[idx];
        if strip_bullet_prefix(line).is_some() {
            break;
        }

        let mut is_header_line = false;
        if header.dates.is_none() {
            if let Some(dates) = find_date_range(line) {
                header.dates = Some(dates);
                is_header_line = true;
            }
        }
        if line.contains('\t') && header.absorb_tab_line(line) {
            is_header_line = true;
        }
        if header.role.is_none() {
            if line.contains('|') {
                is_header_line |= header.absorb_pipe_line(line);
            } else if is_role_line(line) {
                header.role = clean(line);
                is_header_line = true;
            }
        }
        consumed[idx] |= is_header_line;
    }

    // "City" on one short line, "ST" on the next.
    for idx in 1..lookahead_end.saturating_sub(1) {
        if header.location.is_some() {
            break;
        }
        if consumed[idx] || consumed[idx + 1] {
            continue;
        }
        if is_city_line(lines[idx]) && is_state_line(lines[idx + 1]) {
            let city = lines[idx].trim().trim_end_matches(',');
            header.location = Some(format!("{city}, {}", lines[idx + 1].trim()));
            consumed[idx] = true;
            consumed[idx + 1] = true;
        }
    }

    let remaining = lines
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(line, _)| *line);

    ExperienceEntry {
        company: header.company,
        role: header.role,
        location: header.location,
        dates: header.dates,
        subheader: header.subheader,
        bullets: bulletize(remaining),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB_LAYOUT: &str = "Acme Corp | San Francisco, CA\tJan 2021 – Present\n\
        Senior Software Engineer | Rust, Tokio, Postgres\n\
        • Built backend services and APIs\n\
        • Cut p99 latency by 40%\n\
        Globex\tJun 2018 – Dec 2020\n\
        Software Engineer | Remote\n\
        • Shipped billing platform";

    #[test]
    fn test_tab_layout_splits_jobs_and_reads_headers() {
        let jobs = extract_experience(TAB_LAYOUT);
        assert_eq!(jobs.len(), 2);

        let acme = &jobs[0];
        assert_eq!(acme.company.as_deref(), Some("Acme Corp"));
        assert_eq!(acme.location.as_deref(), Some("San Francisco, CA"));
        assert_eq!(acme.dates.as_deref(), Some("Jan 2021 – Present"));
        assert_eq!(acme.role.as_deref(), Some("Senior Software Engineer"));
        assert_eq!(acme.subheader.as_deref(), Some("Rust, Tokio, Postgres"));
        assert_eq!(
            acme.bullets,
            vec!["Built backend services and APIs", "Cut p99 latency by 40%"]
        );

        let globex = &jobs[1];
        assert_eq!(globex.company.as_deref(), Some("Globex"));
        assert_eq!(globex.role.as_deref(), Some("Software Engineer"));
        assert_eq!(globex.location.as_deref(), Some("Remote"));
        assert_eq!(globex.bullets, vec!["Shipped billing platform"]);
    }

    #[test]
    fn test_pipe_layout_splits_jobs() {
        let text = "Initech\n\
            | Data Analyst | Austin, TX\n\
            Mar 2019 – Feb 2020\n\
            - Automated TPS reports\n\
            Hooli\n\
            | Product Manager\n\
            - Launched Nucleus";
        let jobs = extract_experience(text);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company.as_deref(), Some("Initech"));
        assert_eq!(jobs[0].role.as_deref(), Some("Data Analyst"));
        assert_eq!(jobs[0].location.as_deref(), Some("Austin, TX"));
        assert_eq!(jobs[0].dates.as_deref(), Some("Mar 2019 – Feb 2020"));
        assert_eq!(jobs[0].bullets, vec!["Automated TPS reports"]);
        assert_eq!(jobs[1].company.as_deref(), Some("Hooli"));
        assert_eq!(jobs[1].role.as_deref(), Some("Product Manager"));
        assert_eq!(jobs[1].bullets, vec!["Launched Nucleus"]);
    }

    #[test]
    fn test_city_and_state_on_separate_lines_join_into_location() {
        let text = "Umbrella Corp\tApr 2017 – May 2018\n\
            Raccoon City\n\
            MO\n\
            Research Lead\n\
            Ran experiments";
        let jobs = extract_experience(text);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].location.as_deref(), Some("Raccoon City, MO"));
        assert_eq!(jobs[0].role.as_deref(), Some("Research Lead"));
        assert_eq!(jobs[0].bullets, vec!["Ran experiments"]);
    }

    #[test]
    fn test_header_lines_never_become_bullets() {
        let jobs = extract_experience(TAB_LAYOUT);
        for job in &jobs {
            for bullet in &job.bullets {
                assert!(!bullet.contains('\t'), "header leaked into bullets: {bullet}");
                assert!(!bullet.contains('|'), "header leaked into bullets: {bullet}");
            }
        }
    }

    #[test]
    fn test_long_first_line_is_not_a_company() {
        let text = "A very long line that describes a consulting engagement in detail\tJan 2020 – Feb 2021\n\
            • Did things";
        let jobs = extract_experience(text);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, None);
        assert_eq!(jobs[0].dates.as_deref(), Some("Jan 2020 – Feb 2021"));
    }

    #[test]
    fn test_unstructured_section_yields_single_bullet_entry() {
        let text = "• Freelance web development\n• Open source maintenance";
        let jobs = extract_experience(text);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, None);
        assert_eq!(
            jobs[0].bullets,
            vec!["Freelance web development", "Open source maintenance"]
        );
    }

    #[test]
    fn test_single_job_without_boundary_keeps_its_header() {
        let text = "Acme Corp\n\
            Software Engineer\n\
            Jan 2020 – Present\n\
            • Built APIs\n\
            • Cut costs";
        let jobs = extract_experience(text);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(jobs[0].role.as_deref(), Some("Software Engineer"));
        assert_eq!(jobs[0].dates.as_deref(), Some("Jan 2020 – Present"));
        assert_eq!(jobs[0].bullets, vec!["Built APIs", "Cut costs"]);
    }

    #[test]
    fn test_empty_section_yields_no_entries() {
        assert!(extract_experience("\n \n").is_empty());
    }
}
