//! Error types for DOCX package handling

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The package has no entry at this path.
    #[error("Missing required entry: {0}")]
    MissingEntry(String),

    #[error("Entry {0} is not valid UTF-8")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, DocxError>;
