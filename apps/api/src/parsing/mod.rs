//! Heuristic resume parser: markup → normalised text → sections → entries.
//!
//! Every stage is a pure function of its input. Extraction never fails; a
//! field that cannot be recovered is simply `None` or an empty list.

pub mod contact;
pub mod education;
pub mod experience;
pub mod normalize;
pub mod patterns;
pub mod projects;
pub mod sections;
pub mod skills;

use tracing::debug;

use crate::models::ParsedResume;
use contact::extract_contact;
use education::extract_education;
use experience::extract_experience;
use normalize::{first_lines, normalize_text};
use projects::extract_projects;
use sections::{segment, SectionKind};
use skills::extract_skills;

/// Lines of plain text re-scanned when no name or email was found.
const CONTACT_FALLBACK_LINES: usize = 8;

/// Parses HTML-like markup (or plain text) into a [`ParsedResume`].
pub fn parse_resume_markup(markup: &str) -> ParsedResume {
    let plain = normalize_text(markup);
    let segments = segment(markup, &plain);

    let contact_text = if segments.is_blank(SectionKind::Contact) {
        segments.preamble.as_str()
    } else {
        segments.get(SectionKind::Contact)
    };
    let mut contact = extract_contact(contact_text);
    if contact.name.is_none() && contact.email.is_none() {
        debug!("Contact block had no name or email, rescanning document head");
        contact = extract_contact(&first_lines(&plain, CONTACT_FALLBACK_LINES));
    }

    let resume = ParsedResume {
        contact,
        education: extract_education(segments.get(SectionKind::Education)),
        experience: extract_experience(segments.get(SectionKind::Experience)),
        projects: extract_projects(segments.get(SectionKind::Projects)),
        skills: extract_skills(segments.get(SectionKind::Skills)),
        other: segments.other,
    };

    debug!(
        education = resume.education.len(),
        experience = resume.experience.len(),
        projects = resume.projects.len(),
        skills = resume.skills.len(),
        "Parsed resume"
    );
    resume
}
