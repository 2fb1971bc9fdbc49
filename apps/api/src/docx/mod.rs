//! DOCX packaging: reading the document payload, converting it to parser
//! markup, injecting `{{path}}` placeholders into a template, filling them at
//! export time, and generating a fresh document when no template is usable.

pub mod error;
pub mod filler;
pub mod generator;
pub mod injector;
pub mod markup;
pub mod package;
pub mod payload;

pub use error::DocxError;
pub use filler::populate_template;
pub use generator::generate_document;
pub use injector::{build_template, InjectionReport};
pub use markup::document_to_markup;
pub use package::DocxPackage;
pub use payload::{build_template_payload, TemplatePayload};

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text-node escaping as word processors write it: quotes stay literal.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `{{key}}`
pub fn placeholder(key: &str) -> String {
    format!("{{{{{key}}}}}")
}
