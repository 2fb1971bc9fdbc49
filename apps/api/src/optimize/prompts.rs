// All LLM prompt constants for the Optimize module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};

/// System prompt for resume rewriting.
pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume writer who tailors resumes \
    to a specific job description while keeping every statement truthful.";

/// Rewrite prompt. Replace `{resume}`, `{job}` and `{missing}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Tailor the resume below to the job description.

<RESUME>
{resume}
</RESUME>

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Keywords from the job description that the resume does not mention yet:
{missing}

Return a JSON object with ONLY the sections you changed. Allowed sections and their shapes:
{
  "contact": {"name": "...", "email": "...", "phone": "...", "location": "...", "linkedin": "..."},
  "education": [{"school": "...", "degree": "...", "dates": "...", "gpa": "..."}],
  "experience": [{"company": "...", "role": "...", "location": "...", "dates": "...", "subheader": "...", "bullets": ["..."]}],
  "projects": [{"title": "...", "bullets": ["..."]}],
  "skills": ["..."]
}

Rules:
- Keep entries in the same order as the resume. Entry i in your output replaces entry i of the resume.
- Omit any field you did not change.
- Keep the same number of bullets per entry or fewer.
- Work missing keywords in naturally where the resume supports them."#;

/// System prompt for keyword extraction.
pub const KEYWORDS_SYSTEM: &str = "You are an applicant tracking system that extracts \
    the skills and qualifications a job description asks for.";

/// Keyword extraction prompt. Replace `{job}` before sending.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"Extract the keywords and short phrases a recruiter would search for in the job description below.

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Return a JSON array of strings ordered by importance, for example:
["Python", "REST APIs", "distributed systems"]

Rules:
- Include technologies, tools, methodologies, certifications and domain terms.
- Do NOT include the employer's name or generic words such as "team" or "role".
- Keep each phrase to at most four words."#;

pub fn optimize_system() -> String {
    format!("{OPTIMIZE_SYSTEM} {JSON_ONLY_SYSTEM}")
}

pub fn keywords_system() -> String {
    format!("{KEYWORDS_SYSTEM} {JSON_ONLY_SYSTEM}")
}

pub fn build_optimize_prompt(resume_text: &str, job: &str, missing_keywords: &[String]) -> String {
    let missing = if missing_keywords.is_empty() {
        "(none supplied)".to_string()
    } else {
        missing_keywords.join(", ")
    };
    let prompt = fill_slots(
        OPTIMIZE_PROMPT_TEMPLATE,
        &[("{resume}", resume_text), ("{job}", job), ("{missing}", missing.as_str())],
    );
    format!("{prompt}\n\n{GROUNDING_INSTRUCTION}")
}

/// Substitutes every slot in one left-to-right pass over `template`.
/// Inserted values are never rescanned.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match slots.iter().find(|(slot, _)| rest.starts_with(slot)) {
            Some((slot, value)) => {
                out.push_str(value);
                rest = &rest[slot.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn build_keywords_prompt(job: &str) -> String {
    KEYWORDS_PROMPT_TEMPLATE.replace("{job}", job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_prompt_fills_every_slot() {
        let prompt = build_optimize_prompt(
            "Jane Doe\nRust",
            "Backend engineer",
            &["Kafka".to_string(), "gRPC".to_string()],
        );
        assert!(prompt.contains("Jane Doe\nRust"));
        assert!(prompt.contains("Backend engineer"));
        assert!(prompt.contains("Kafka, gRPC"));
        assert!(prompt.ends_with(GROUNDING_INSTRUCTION));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{missing}"));
    }

    #[test]
    fn test_optimize_prompt_without_hints() {
        let prompt = build_optimize_prompt("r", "j", &[]);
        assert!(prompt.contains("(none supplied)"));
    }

    #[test]
    fn test_braced_text_in_inputs_stays_literal() {
        let prompt = build_optimize_prompt(
            "Wrote a {job} scheduler and {missing} report",
            "Uses {resume} templating",
            &["Kafka".to_string()],
        );
        assert!(prompt.contains("Wrote a {job} scheduler and {missing} report"));
        assert!(prompt.contains("Uses {resume} templating"));
        assert_eq!(prompt.matches("Uses {resume} templating").count(), 1);
        assert!(prompt.contains("\"projects\": [{\"title\""));
    }

    #[test]
    fn test_keywords_prompt() {
        let prompt = build_keywords_prompt("We need Go and Kubernetes");
        assert!(prompt.contains("We need Go and Kubernetes"));
        assert!(!prompt.contains("{job}"));
        assert!(keywords_system().contains("valid JSON only"));
    }
}
