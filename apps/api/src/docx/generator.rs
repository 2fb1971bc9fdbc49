//! Fresh-document generation: a minimal valid package laid out so that
//! converting and re-parsing it recovers the same fields.

use super::error::Result;
use super::escape_text;
use super::package::{write_package, DOCUMENT_ENTRY};
use crate::models::ParsedResume;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const DOCUMENT_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
);

const DOCUMENT_CLOSE: &str = r#"<w:sectPr/></w:body></w:document>"#;

const BULLET: &str = "• ";

/// Accumulates `w:p` elements.
#[derive(Default)]
struct Body {
    xml: String,
}

impl Body {
    fn paragraph(&mut self, style: Option<&str>, bold: bool, segments: &[&str]) {
        self.xml.push_str("<w:p>");
        if let Some(style) = style {
            self.xml
                .push_str(&format!(r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#));
        }
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                self.xml.push_str("<w:r><w:tab/></w:r>");
            }
            self.xml.push_str("<w:r>");
            if bold {
                self.xml.push_str("<w:rPr><w:b/></w:rPr>");
            }
            self.xml.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
                escape_text(segment)
            ));
        }
        self.xml.push_str("</w:p>");
    }

    fn text(&mut self, text: &str) {
        self.paragraph(None, false, &[text]);
    }

    fn heading(&mut self, title: &str) {
        self.paragraph(Some("Heading1"), true, &[title]);
    }

    fn bullet(&mut self, text: &str) {
        let line = format!("{BULLET}{text}");
        self.paragraph(Some("ListBullet"), false, &[line.as_str()]);
    }
}

fn joined(fields: &[&Option<String>]) -> Option<String> {
    let present: Vec<&str> = fields
        .iter()
        .filter_map(|f| f.as_deref())
        .filter(|f| !f.trim().is_empty())
        .collect();
    (!present.is_empty()).then(|| present.join(" | "))
}

/// `left<TAB>right`, or whichever side exists.
fn header(body: &mut Body, left: Option<String>, right: Option<&str>) {
    match (left.as_deref(), right) {
        (Some(l), Some(r)) => body.paragraph(None, false, &[l, r]),
        (Some(only), None) | (None, Some(only)) => body.text(only),
        (None, None) => {}
    }
}

pub fn generate_document(resume: &ParsedResume) -> Result<Vec<u8>> {
    let mut body = Body::default();
    let contact = &resume.contact;

    if let Some(name) = contact.name.as_deref() {
        body.paragraph(None, true, &[name]);
    }
    if let Some(line) = joined(&[
        &contact.email,
        &contact.phone,
        &contact.location,
        &contact.linkedin,
    ]) {
        body.text(&line);
    }

    if !resume.education.is_empty() {
        body.heading("EDUCATION");
        for entry in &resume.education {
            if !entry.has_structured_fields() {
                for line in entry.raw_text.iter().flat_map(|raw| raw.lines()) {
                    body.text(line);
                }
                continue;
            }
            header(&mut body, entry.school.clone(), entry.dates.as_deref());
            let gpa = entry.gpa.as_ref().map(|g| format!("GPA: {g}"));
            if let Some(line) = joined(&[&entry.degree, &gpa]) {
                body.text(&line);
            }
        }
    }

    if !resume.experience.is_empty() {
        body.heading("EXPERIENCE");
        for job in &resume.experience {
            header(
                &mut body,
                joined(&[&job.company, &job.location]),
                job.dates.as_deref(),
            );
            if let Some(line) = joined(&[&job.role, &job.subheader]) {
                body.text(&line);
            }
            for bullet in &job.bullets {
                body.bullet(bullet);
            }
        }
    }

    if !resume.projects.is_empty() {
        body.heading("PROJECTS");
        for project in &resume.projects {
            if let Some(title) = project.title.as_deref() {
                body.text(title);
            }
            for bullet in &project.bullets {
                body.bullet(bullet);
            }
        }
    }

    if !resume.skills.is_empty() {
        body.heading("SKILLS");
        body.text(&resume.skills.join(", "));
    }

    let document = format!("{DOCUMENT_OPEN}{}{DOCUMENT_CLOSE}", body.xml);
    write_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        (DOCUMENT_ENTRY, document.as_str()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::markup::document_to_markup;
    use crate::docx::package::DocxPackage;
    use crate::models::{Contact, EducationEntry, ExperienceEntry, ProjectEntry};
    use crate::parsing::parse_resume_markup;

    fn resume() -> ParsedResume {
        ParsedResume {
            contact: Contact {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                phone: Some("(206) 555-0147".to_string()),
                location: Some("Seattle, WA".to_string()),
                ..Default::default()
            },
            education: vec![EducationEntry {
                school: Some("Stanford University".to_string()),
                degree: Some("Bachelor of Science in Computer Science".to_string()),
                dates: Some("Sep 2016 – Jun 2020".to_string()),
                gpa: Some("3.8".to_string()),
                raw_text: None,
            }],
            experience: vec![ExperienceEntry {
                company: Some("R&D Corp".to_string()),
                location: Some("Austin, TX".to_string()),
                dates: Some("Jan 2021 – Present".to_string()),
                role: Some("Software Engineer".to_string()),
                subheader: Some("Rust, Postgres".to_string()),
                bullets: vec![
                    "Built backend services".to_string(),
                    "Cut costs by 30%".to_string(),
                ],
            }],
            projects: vec![ProjectEntry {
                title: Some("Resume Forge | Rust".to_string()),
                bullets: vec!["Parses resumes".to_string()],
            }],
            skills: vec!["Rust".to_string(), "Go".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_package_has_required_parts() {
        let bytes = generate_document(&resume()).unwrap();
        let package = DocxPackage::from_bytes(bytes).unwrap();
        let xml = package.document_xml();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("R&amp;D Corp | Austin, TX</w:t></w:r><w:r><w:tab/></w:r>"));
        assert!(xml.contains("• Built backend services"));
    }

    #[test]
    fn test_generated_document_parses_back() {
        let bytes = generate_document(&resume()).unwrap();
        let package = DocxPackage::from_bytes(bytes).unwrap();
        let parsed = parse_resume_markup(&document_to_markup(package.document_xml()).unwrap());

        assert_eq!(parsed.contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.contact.email.as_deref(), Some("jane@example.com"));

        assert_eq!(parsed.education.len(), 1);
        assert_eq!(parsed.education[0].school.as_deref(), Some("Stanford University"));
        assert_eq!(parsed.education[0].gpa.as_deref(), Some("3.8"));

        assert_eq!(parsed.experience.len(), 1);
        let job = &parsed.experience[0];
        assert_eq!(job.company.as_deref(), Some("R&D Corp"));
        assert_eq!(job.location.as_deref(), Some("Austin, TX"));
        assert_eq!(job.dates.as_deref(), Some("Jan 2021 – Present"));
        assert_eq!(job.role.as_deref(), Some("Software Engineer"));
        assert_eq!(job.bullets, resume().experience[0].bullets);

        assert_eq!(parsed.projects[0].title.as_deref(), Some("Resume Forge"));
        assert_eq!(parsed.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_empty_resume_still_produces_a_package() {
        let bytes = generate_document(&ParsedResume::default()).unwrap();
        assert!(DocxPackage::from_bytes(bytes).is_ok());
    }
}
