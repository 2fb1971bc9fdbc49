//! Export: fills `{{key}}` placeholders in a template package.
//!
//! Pass 1 (`patch_paragraphs`) rewrites paragraphs whose whole text is a single
//! placeholder, even when the token is split across runs, into one run that
//! keeps the paragraph and first-run properties. Pass 2 (`replace_raw`)
//! substitutes every literal `{{key}}` left anywhere in the payload text,
//! which covers tokens inside hyperlinks and tokens sharing a paragraph with
//! other text.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use super::error::{DocxError, Result};
use super::package::{DocxPackage, DOCUMENT_ENTRY};
use super::payload::TemplatePayload;
use super::{escape_xml, placeholder};

const PARAGRAPH: &[u8] = b"w:p";
const RUN: &[u8] = b"w:r";
const TEXT: &[u8] = b"w:t";
const HYPERLINK: &[u8] = b"w:hyperlink";
const PARAGRAPH_PROPS: &[u8] = b"w:pPr";
const RUN_PROPS: &[u8] = b"w:rPr";

pub fn populate_template(template: &[u8], payload: &TemplatePayload) -> Result<Vec<u8>> {
    let package = DocxPackage::from_bytes(template.to_vec())?;
    let patched = patch_paragraphs(package.document_xml(), payload)?;
    let filled = replace_raw(&patched, payload);
    package.with_document_xml(&filled)
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: paragraph patch
// ────────────────────────────────────────────────────────────────────────────

pub fn patch_paragraphs(xml: &str, payload: &TemplatePayload) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    let mut paragraph: Vec<Event> = Vec::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Eof) {
            break;
        }
        let opens = matches!(&event, Event::Start(e) if e.name().as_ref() == PARAGRAPH);
        let closes = matches!(&event, Event::End(e) if e.name().as_ref() == PARAGRAPH);

        if opens {
            depth += 1;
        }
        if depth == 0 {
            writer.write_event(event)?;
            continue;
        }

        paragraph.push(event);
        if closes {
            depth -= 1;
            if depth == 0 {
                for event in rewrite_paragraph(std::mem::take(&mut paragraph), payload) {
                    writer.write_event(event)?;
                }
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|_| DocxError::Encoding(DOCUMENT_ENTRY.into()))
}

fn is_named(event: &Event, name: &[u8]) -> bool {
    match event {
        Event::Start(e) | Event::Empty(e) => e.name().as_ref() == name,
        _ => false,
    }
}

/// The element starting at `events[0]` through its matching end.
fn subtree<'e, 'a>(events: &'e [Event<'a>]) -> &'e [Event<'a>] {
    let mut depth = 0usize;
    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &events[..=i];
                }
            }
            _ if depth == 0 => return &events[..=i],
            _ => {}
        }
    }
    events
}

fn child<'e, 'a>(events: &'e [Event<'a>], name: &[u8]) -> Option<&'e [Event<'a>]> {
    let start = events.iter().position(|e| is_named(e, name))?;
    Some(subtree(&events[start..]))
}

/// The payload value when the paragraph's text, outside any hyperlink, is
/// exactly one known placeholder.
fn paragraph_value<'p>(events: &[Event], payload: &'p TemplatePayload) -> Option<&'p str> {
    let mut text = String::new();
    let mut in_text = false;

    for event in events {
        match event {
            e if is_named(e, HYPERLINK) => return None,
            Event::Start(e) if e.name().as_ref() == TEXT => in_text = true,
            Event::End(e) if e.name().as_ref() == TEXT => in_text = false,
            Event::Text(t) if in_text => text.push_str(&t.unescape().ok()?),
            _ => {}
        }
    }

    let key = text.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    payload.get(key).map(String::as_str)
}

fn rewrite_paragraph<'a>(events: Vec<Event<'a>>, payload: &TemplatePayload) -> Vec<Event<'a>> {
    let Some(value) = paragraph_value(&events, payload) else {
        return events;
    };
    let (Some(open), Some(close)) = (events.first(), events.last()) else {
        return events;
    };

    let mut out = vec![open.clone()];
    if let Some(props) = child(&events[1..], PARAGRAPH_PROPS) {
        out.extend_from_slice(props);
    }

    out.push(Event::Start(BytesStart::new("w:r")));
    let first_run = events.iter().position(|e| is_named(e, RUN));
    if let Some(props) = first_run.and_then(|run| child(subtree(&events[run..]), RUN_PROPS)) {
        out.extend_from_slice(props);
    }
    let mut text_start = BytesStart::new("w:t");
    text_start.push_attribute(("xml:space", "preserve"));
    out.push(Event::Start(text_start));
    out.push(Event::Text(BytesText::from_escaped(escape_xml(value))));
    out.push(Event::End(BytesEnd::new("w:t")));
    out.push(Event::End(BytesEnd::new("w:r")));

    out.push(close.clone());
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: raw replacement
// ────────────────────────────────────────────────────────────────────────────

pub fn replace_raw(xml: &str, payload: &TemplatePayload) -> String {
    let mut out = xml.to_string();
    for (key, value) in payload {
        let token = placeholder(key);
        if out.contains(&token) {
            debug!(%key, "Raw placeholder replacement");
            out = out.replace(&token, &escape_xml(value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> TemplatePayload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_patch_keeps_paragraph_and_first_run_properties() {
        let xml = concat!(
            r#"<w:body><w:p w:rsidR="00A1"><w:pPr><w:pStyle w:val="Title"/><w:rPr><w:b/></w:rPr></w:pPr>"#,
            r#"<w:r><w:rPr><w:i/></w:rPr><w:t>{{</w:t></w:r><w:r><w:t>contact.name}}</w:t></w:r></w:p></w:body>"#,
        );
        let out = patch_paragraphs(xml, &payload(&[("contact.name", "Jane & Co")])).unwrap();

        assert_eq!(
            out,
            concat!(
                r#"<w:body><w:p w:rsidR="00A1"><w:pPr><w:pStyle w:val="Title"/><w:rPr><w:b/></w:rPr></w:pPr>"#,
                r#"<w:r><w:rPr><w:i/></w:rPr><w:t xml:space="preserve">Jane &amp; Co</w:t></w:r></w:p></w:body>"#,
            )
        );
    }

    #[test]
    fn test_patch_leaves_other_paragraphs_untouched() {
        let xml = r#"<w:body><w:p><w:r><w:t xml:space="preserve">Worked at {{experience.0.company}} daily</w:t></w:r></w:p><w:p/></w:body>"#;
        let out = patch_paragraphs(xml, &payload(&[("experience.0.company", "Acme")])).unwrap();
        assert_eq!(out, xml);
    }

    #[test]
    fn test_hyperlinked_placeholder_is_filled_by_raw_pass() {
        let xml = r#"<w:p><w:hyperlink r:id="rId7"><w:r><w:t>{{contact.linkedin}}</w:t></w:r></w:hyperlink></w:p>"#;
        let values = payload(&[("contact.linkedin", "https://linkedin.com/in/jane")]);

        let patched = patch_paragraphs(xml, &values).unwrap();
        assert_eq!(patched, xml);

        let filled = replace_raw(&patched, &values);
        assert_eq!(
            filled,
            r#"<w:p><w:hyperlink r:id="rId7"><w:r><w:t>https://linkedin.com/in/jane</w:t></w:r></w:hyperlink></w:p>"#
        );
    }

    #[test]
    fn test_raw_pass_replaces_every_occurrence_and_escapes() {
        let out = replace_raw(
            "<w:t>{{skills}}</w:t><w:t>{{skills}}</w:t><w:t>{{unknown}}</w:t>",
            &payload(&[("skills", "C++ <Rust>")]),
        );
        assert_eq!(
            out,
            "<w:t>C++ &lt;Rust&gt;</w:t><w:t>C++ &lt;Rust&gt;</w:t><w:t>{{unknown}}</w:t>"
        );
    }

    #[test]
    fn test_raw_pass_finds_nothing_left_by_patch() {
        let xml = r#"<w:p><w:r><w:t>{{contact.email}}</w:t></w:r></w:p><w:p><w:r><w:t>Email: {{contact.email}}</w:t></w:r></w:p>"#;
        let values = payload(&[("contact.email", "jane@example.com")]);

        let patched = patch_paragraphs(xml, &values).unwrap();
        assert_eq!(patched.matches("{{contact.email}}").count(), 1);

        let filled = replace_raw(&patched, &values);
        assert_eq!(filled.matches("jane@example.com").count(), 2);
        assert!(!filled.contains("{{"));
    }

    #[test]
    fn test_empty_value_clears_placeholder() {
        let xml = "<w:p><w:r><w:t>{{contact.phone}}</w:t></w:r></w:p>";
        let out = patch_paragraphs(xml, &payload(&[("contact.phone", "")])).unwrap();
        assert_eq!(
            out,
            r#"<w:p><w:r><w:t xml:space="preserve"></w:t></w:r></w:p>"#
        );
    }
}
