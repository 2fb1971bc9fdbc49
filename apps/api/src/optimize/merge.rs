//! Overlay merge: applies a sparse [`OptimizedSections`] over a parsed resume.
//!
//! A section is touched only when the overlay supplies it non-empty. List
//! sections merge positionally; the original's entry count and order always
//! win, extra overlay entries are ignored.

use crate::models::{
    Contact, EducationEntry, ExperienceEntry, OptimizedSections, ParsedResume, ProjectEntry,
};

pub fn apply_overlay(original: &ParsedResume, overlay: &OptimizedSections) -> ParsedResume {
    let mut merged = original.clone();

    if let Some(contact) = overlay.contact.as_ref().filter(|c| !c.is_empty()) {
        merged.contact = merge_contact(&original.contact, contact);
    }
    if let Some(entries) = non_empty(&overlay.education) {
        merged.education = merge_positional(&original.education, entries, merge_education);
    }
    if let Some(entries) = non_empty(&overlay.experience) {
        merged.experience = merge_positional(&original.experience, entries, merge_experience);
    }
    if let Some(entries) = non_empty(&overlay.projects) {
        merged.projects = merge_positional(&original.projects, entries, merge_project);
    }
    if let Some(skills) = non_empty(&overlay.skills) {
        merged.skills = skills.to_vec();
    }

    merged
}

fn non_empty<T>(section: &Option<Vec<T>>) -> Option<&[T]> {
    section.as_deref().filter(|s| !s.is_empty())
}

fn merge_positional<T: Clone>(original: &[T], overlay: &[T], merge: fn(&T, &T) -> T) -> Vec<T> {
    original
        .iter()
        .enumerate()
        .map(|(i, orig)| match overlay.get(i) {
            Some(over) => merge(orig, over),
            None => orig.clone(),
        })
        .collect()
}

/// Overlay value unless it is absent or blank.
fn pick(over: &Option<String>, orig: &Option<String>) -> Option<String> {
    match over {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => orig.clone(),
    }
}

fn pick_bullets(over: &[String], orig: &[String]) -> Vec<String> {
    let chosen = if over.is_empty() { orig } else { over };
    chosen.to_vec()
}

fn merge_contact(orig: &Contact, over: &Contact) -> Contact {
    Contact {
        name: pick(&over.name, &orig.name),
        email: pick(&over.email, &orig.email),
        phone: pick(&over.phone, &orig.phone),
        location: pick(&over.location, &orig.location),
        linkedin: pick(&over.linkedin, &orig.linkedin),
    }
}

fn merge_education(orig: &EducationEntry, over: &EducationEntry) -> EducationEntry {
    EducationEntry {
        school: pick(&over.school, &orig.school),
        degree: pick(&over.degree, &orig.degree),
        dates: pick(&over.dates, &orig.dates),
        gpa: pick(&over.gpa, &orig.gpa),
        raw_text: pick(&over.raw_text, &orig.raw_text),
    }
}

fn merge_experience(orig: &ExperienceEntry, over: &ExperienceEntry) -> ExperienceEntry {
    ExperienceEntry {
        company: pick(&over.company, &orig.company),
        role: pick(&over.role, &orig.role),
        location: pick(&over.location, &orig.location),
        dates: pick(&over.dates, &orig.dates),
        subheader: pick(&over.subheader, &orig.subheader),
        bullets: pick_bullets(&over.bullets, &orig.bullets),
    }
}

fn merge_project(orig: &ProjectEntry, over: &ProjectEntry) -> ProjectEntry {
    ProjectEntry {
        title: pick(&over.title, &orig.title),
        bullets: pick_bullets(&over.bullets, &orig.bullets),
    }
}
