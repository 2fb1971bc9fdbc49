//! Template build: swaps the first occurrence of each resume value in the
//! document payload for its `{{path}}` placeholder.
//!
//! Values are searched in slot order. A value repeated elsewhere in the
//! document only gets a placeholder at its first remaining occurrence, and a
//! value that cannot be found (e.g. split across runs) is skipped.

use serde::Serialize;
use tracing::{debug, info};

use super::error::Result;
use super::package::DocxPackage;
use super::payload::{joined_skills, template_slots};
use super::{escape_text, placeholder};
use crate::models::ParsedResume;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionReport {
    pub injected: Vec<String>,
    /// Slots with a value that was not found in the document.
    pub skipped: Vec<String>,
}

pub fn inject_placeholders(document_xml: &str, resume: &ParsedResume) -> (String, InjectionReport) {
    let mut xml = document_xml.to_string();
    let mut report = InjectionReport::default();
    let skills = joined_skills(resume);

    for slot in template_slots(resume, &skills) {
        let Some(value) = slot.value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let needle = escape_text(value);
        match xml.find(&needle) {
            Some(start) => {
                xml.replace_range(start..start + needle.len(), &placeholder(&slot.key));
                report.injected.push(slot.key);
            }
            None => {
                debug!(key = %slot.key, "Value not found in document, no placeholder");
                report.skipped.push(slot.key);
            }
        }
    }

    (xml, report)
}

/// Injects placeholders for `resume` into the package and returns the new
/// package bytes with the injection report.
pub fn build_template(
    package_bytes: Vec<u8>,
    resume: &ParsedResume,
) -> Result<(Vec<u8>, InjectionReport)> {
    let package = DocxPackage::from_bytes(package_bytes)?;
    let (xml, report) = inject_placeholders(package.document_xml(), resume);
    let bytes = package.with_document_xml(&xml)?;

    info!(
        injected = report.injected.len(),
        skipped = report.skipped.len(),
        "Template built"
    );
    Ok((bytes, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::filler::populate_template;
    use crate::docx::package::{write_package, DOCUMENT_ENTRY};
    use crate::docx::payload::build_template_payload;
    use crate::models::{Contact, ExperienceEntry};

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn document() -> String {
        format!(
            "<w:document><w:body>{}{}{}{}{}</w:body></w:document>",
            para("Jane Doe"),
            para("jane@example.com"),
            para("R&amp;D Labs"),
            para("Grew R&amp;D Labs revenue"),
            para("Rust, Go"),
        )
    }

    fn resume() -> ParsedResume {
        ParsedResume {
            contact: Contact {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                phone: Some("(555) 010-0199".to_string()),
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                company: Some("R&D Labs".to_string()),
                bullets: vec!["Grew R&D Labs revenue".to_string()],
                ..Default::default()
            }],
            skills: vec!["Rust".to_string(), "Go".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_injects_escaped_values_in_slot_order() {
        let (xml, report) = inject_placeholders(&document(), &resume());

        assert!(xml.contains(&para("{{contact.name}}")));
        assert!(xml.contains(&para("{{contact.email}}")));
        assert!(xml.contains(&para("{{experience.0.company}}")));
        assert!(xml.contains(&para("{{skills}}")));
        assert_eq!(
            report.injected,
            vec![
                "contact.name",
                "contact.email",
                "experience.0.company",
                "experience.0.bullet.0",
                "skills"
            ]
        );
        assert_eq!(report.skipped, vec!["contact.phone"]);
    }

    #[test]
    fn test_only_first_occurrence_is_replaced() {
        let xml = format!("{}{}", para("Acme"), para("Acme"));
        let resume = ParsedResume {
            experience: vec![ExperienceEntry {
                company: Some("Acme".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (out, _) = inject_placeholders(&xml, &resume);
        assert_eq!(out, format!("{}{}", para("{{experience.0.company}}"), para("Acme")));
    }

    #[test]
    fn test_second_injection_is_a_no_op() {
        let (once, _) = inject_placeholders(&document(), &resume());
        let (twice, report) = inject_placeholders(&once, &resume());
        assert_eq!(twice, once);
        assert!(report.injected.is_empty());
    }

    #[test]
    fn test_template_round_trip_leaves_no_tokens() {
        let doc = document();
        let source = write_package(&[(DOCUMENT_ENTRY, doc.as_str())]).unwrap();
        let (template, _) = build_template(source, &resume()).unwrap();

        let payload = build_template_payload(&resume(), None);
        let output = populate_template(&template, &payload).unwrap();
        let xml = DocxPackage::from_bytes(output).unwrap().document_xml().to_string();

        for key in payload.keys() {
            assert!(!xml.contains(&placeholder(key)), "residual token for {key}");
        }
        assert!(xml.contains("Jane Doe"));
        assert!(xml.contains("R&amp;D Labs"));
        assert!(xml.contains("Rust, Go"));
    }
}
