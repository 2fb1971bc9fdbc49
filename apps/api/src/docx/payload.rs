//! Template slots and the flat export payload.
//!
//! Both the injector and the payload walk the same capped slot list, so a
//! template never carries a placeholder that export cannot fill.

use std::collections::BTreeMap;

use crate::models::{OptimizedSections, ParsedResume};
use crate::optimize::merge::apply_overlay;

pub const MAX_EDUCATION: usize = 2;
pub const MAX_EXPERIENCE: usize = 3;
pub const MAX_EXPERIENCE_BULLETS: usize = 4;
pub const MAX_PROJECTS: usize = 2;
pub const MAX_PROJECT_BULLETS: usize = 2;

/// Dotted path → value. Every capped slot is present; missing data is `""`.
pub type TemplatePayload = BTreeMap<String, String>;

/// One placeholder position and the resume value that belongs there.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<'a> {
    pub key: String,
    pub value: Option<&'a str>,
}

fn slot(key: String, value: Option<&str>) -> Slot<'_> {
    Slot { key, value }
}

/// Every slot in fixed traversal order: contact, education, experience
/// (header fields then bullets), projects, then the joined skills string.
pub fn template_slots<'a>(resume: &'a ParsedResume, skills: &'a str) -> Vec<Slot<'a>> {
    let mut slots = Vec::new();

    let c = &resume.contact;
    slots.push(slot("contact.name".into(), c.name.as_deref()));
    slots.push(slot("contact.email".into(), c.email.as_deref()));
    slots.push(slot("contact.phone".into(), c.phone.as_deref()));
    slots.push(slot("contact.location".into(), c.location.as_deref()));
    slots.push(slot("contact.linkedin".into(), c.linkedin.as_deref()));

    for i in 0..MAX_EDUCATION {
        let entry = resume.education.get(i);
        slots.push(slot(
            format!("education.{i}.school"),
            entry.and_then(|e| e.school.as_deref()),
        ));
        slots.push(slot(
            format!("education.{i}.degree"),
            entry.and_then(|e| e.degree.as_deref()),
        ));
        slots.push(slot(
            format!("education.{i}.dates"),
            entry.and_then(|e| e.dates.as_deref()),
        ));
        slots.push(slot(
            format!("education.{i}.gpa"),
            entry.and_then(|e| e.gpa.as_deref()),
        ));
    }

    for i in 0..MAX_EXPERIENCE {
        let job = resume.experience.get(i);
        slots.push(slot(
            format!("experience.{i}.company"),
            job.and_then(|j| j.company.as_deref()),
        ));
        slots.push(slot(
            format!("experience.{i}.location"),
            job.and_then(|j| j.location.as_deref()),
        ));
        slots.push(slot(
            format!("experience.{i}.dates"),
            job.and_then(|j| j.dates.as_deref()),
        ));
        slots.push(slot(
            format!("experience.{i}.role"),
            job.and_then(|j| j.role.as_deref()),
        ));
        slots.push(slot(
            format!("experience.{i}.subheader"),
            job.and_then(|j| j.subheader.as_deref()),
        ));
        for b in 0..MAX_EXPERIENCE_BULLETS {
            slots.push(slot(
                format!("experience.{i}.bullet.{b}"),
                job.and_then(|j| j.bullets.get(b)).map(String::as_str),
            ));
        }
    }

    for i in 0..MAX_PROJECTS {
        let project = resume.projects.get(i);
        slots.push(slot(
            format!("projects.{i}.title"),
            project.and_then(|p| p.title.as_deref()),
        ));
        for b in 0..MAX_PROJECT_BULLETS {
            slots.push(slot(
                format!("projects.{i}.bullet.{b}"),
                project.and_then(|p| p.bullets.get(b)).map(String::as_str),
            ));
        }
    }

    slots.push(slot("skills".into(), Some(skills)));
    slots
}

pub fn joined_skills(resume: &ParsedResume) -> String {
    resume.skills.join(", ")
}

/// Flattens `resume`, with `optimized` merged over it when given, into the
/// export payload.
pub fn build_template_payload(
    resume: &ParsedResume,
    optimized: Option<&OptimizedSections>,
) -> TemplatePayload {
    let merged;
    let resume = match optimized {
        Some(overlay) => {
            merged = apply_overlay(resume, overlay);
            &merged
        }
        None => resume,
    };

    let skills = joined_skills(resume);
    template_slots(resume, &skills)
        .into_iter()
        .map(|s| (s.key, s.value.unwrap_or_default().to_string()))
        .collect()
}
