use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contact block. Every field is optional; absence is never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.linkedin.is_none()
    }
}

/// One degree / school. `raw_text` always carries the unparsed block so an
/// entry is never entirely empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl EducationEntry {
    pub fn has_structured_fields(&self) -> bool {
        self.school.is_some() || self.degree.is_some() || self.dates.is_some() || self.gpa.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    /// Free-text line under the header, usually a tech-stack list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheader: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Root aggregate produced by a single parse. Each section extractor returns
/// a complete replacement list; nothing is mutated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    /// Display order is preserved; comparison treats these as a set.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Unrecognised section title → raw section text.
    #[serde(default)]
    pub other: BTreeMap<String, String>,
}

/// Sparse overlay returned by the optimizer. Any subset of sections may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedSections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

impl OptimizedSections {
    pub fn is_empty(&self) -> bool {
        self.contact.is_none()
            && self.education.is_none()
            && self.experience.is_none()
            && self.projects.is_none()
            && self.skills.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let contact = Contact {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Jane Doe" }));
    }

    #[test]
    fn test_present_but_empty_is_distinct_from_absent() {
        let json = r#"{ "company": "", "bullets": [] }"#;
        let entry: ExperienceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.company, Some(String::new()));
        assert_eq!(entry.role, None);
    }

    #[test]
    fn test_education_raw_text_uses_camel_case() {
        let entry = EducationEntry {
            raw_text: Some("Self-taught".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"rawText\""));
        assert!(!entry.has_structured_fields());
    }

    #[test]
    fn test_missing_bullets_deserialize_as_empty_vec() {
        let project: ProjectEntry = serde_json::from_str(r#"{ "title": "Forge" }"#).unwrap();
        assert!(project.bullets.is_empty());
    }

    #[test]
    fn test_overlay_with_no_sections_is_empty() {
        let overlay: OptimizedSections = serde_json::from_str("{}").unwrap();
        assert!(overlay.is_empty());
    }
}
