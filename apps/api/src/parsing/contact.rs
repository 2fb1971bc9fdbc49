use std::sync::LazyLock;

use regex::Regex;

use crate::models::Contact;
use crate::parsing::patterns::find_location;

const MAX_FALLBACK_NAME_CHARS: usize = 50;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/([A-Za-z0-9_-]+)").unwrap()
});

static NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([A-Z][a-zA-Z'’-]+(?:[ ]+[A-Z][a-zA-Z'’.-]*){1,2})(?:[ \t]|[|,•·–—-]|$)")
        .unwrap()
});

/// Extracts every contact field independently; the first match wins per field.
pub fn extract_contact(text: &str) -> Contact {
    Contact {
        name: find_name(text),
        email: find_email(text),
        phone: find_phone(text),
        location: find_location(text),
        linkedin: find_linkedin(text),
    }
}

pub fn find_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

pub fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| p.chars().filter(char::is_ascii_digit).count() >= 10)
}

/// Normalised to an `https://` profile URL.
pub fn find_linkedin(text: &str) -> Option<String> {
    LINKEDIN
        .captures(text)
        .map(|caps| format!("https://linkedin.com/in/{}", &caps[1]))
}

/// Two or three capitalised words at a line start, else a short letters-only
/// first line.
pub fn find_name(text: &str) -> Option<String> {
    NAME_LINE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .or_else(|| first_line_name(text))
}

fn first_line_name(text: &str) -> Option<String> {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let plausible = first.chars().count() < MAX_FALLBACK_NAME_CHARS
        && !first.contains('@')
        && first.chars().all(|c| c.is_alphabetic() || c == ' ');
    plausible.then(|| first.to_string())
}
