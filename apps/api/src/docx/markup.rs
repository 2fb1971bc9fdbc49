//! `word/document.xml` → the simple HTML markup the resume parser consumes.
//!
//! Heading-styled paragraphs become `<h2>`, numbered or bulleted paragraphs
//! `<li>`, fully bold paragraphs `<p><strong>`, everything else `<p>`. Tabs
//! are kept as `\t` and line breaks become `<br>`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::Result;
use super::escape_text;

#[derive(Default)]
struct Paragraph {
    style: Option<String>,
    numbered: bool,
    text: String,
    has_text: bool,
    all_bold: bool,
}

impl Paragraph {
    fn new() -> Self {
        Self {
            all_bold: true,
            ..Default::default()
        }
    }

    fn is_heading(&self) -> bool {
        self.style
            .as_deref()
            .is_some_and(|s| s.starts_with("Heading") || s == "Title")
    }

    fn render(self) -> Option<String> {
        if !self.has_text {
            return None;
        }
        let text = self.text.trim_end_matches("<br>");
        let html = if self.is_heading() {
            format!("<h2>{text}</h2>")
        } else if self.numbered {
            format!("<li>{text}</li>")
        } else if self.all_bold {
            format!("<p><strong>{text}</strong></p>")
        } else {
            format!("<p>{text}</p>")
        };
        Some(html)
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    let value = e.try_get_attribute(key).ok()??;
    value.unescape_value().ok().map(|v| v.into_owned())
}

/// `<w:b/>` and `<w:b w:val="1"/>` are bold; `w:val="0"`/`"false"` are not.
fn is_bold_toggle(e: &BytesStart) -> bool {
    !matches!(attr(e, b"w:val").as_deref(), Some("0") | Some("false"))
}

pub fn document_to_markup(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph: Option<Paragraph> = None;
    let mut in_run = false;
    let mut in_text = false;
    let mut run_bold = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => paragraph = Some(Paragraph::new()),
                b"w:r" => {
                    in_run = true;
                    run_bold = false;
                }
                b"w:t" => in_text = true,
                b"w:numPr" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.numbered = true;
                    }
                }
                b"w:b" if in_run => run_bold = is_bold_toggle(&e),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:pStyle" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.style = attr(&e, b"w:val");
                    }
                }
                b"w:b" if in_run => run_bold = is_bold_toggle(&e),
                b"w:tab" if in_run => {
                    if let Some(p) = paragraph.as_mut() {
                        p.text.push('\t');
                    }
                }
                b"w:br" | b"w:cr" if in_run => {
                    if let Some(p) = paragraph.as_mut() {
                        p.text.push_str("<br>");
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape()?;
                if let Some(p) = paragraph.as_mut() {
                    if !text.trim().is_empty() {
                        p.has_text = true;
                        p.all_bold &= run_bold;
                    }
                    p.text.push_str(&escape_text(&text));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(html) = paragraph.take().and_then(Paragraph::render) {
                        blocks.push(html);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            _ => {}
        }
    }

    Ok(blocks.join("\n"))
}
