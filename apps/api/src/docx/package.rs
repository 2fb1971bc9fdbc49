//! A DOCX package held in memory. Only `word/document.xml` is ever read or
//! rewritten; every other entry passes through byte-for-byte.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{DocxError, Result};

pub const DOCUMENT_ENTRY: &str = "word/document.xml";

#[derive(Debug, Clone)]
pub struct DocxPackage {
    bytes: Vec<u8>,
    document_xml: String,
}

impl DocxPackage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let raw = read_entry_bytes(&bytes, DOCUMENT_ENTRY)?;
        let document_xml =
            String::from_utf8(raw).map_err(|_| DocxError::Encoding(DOCUMENT_ENTRY.to_string()))?;

        Ok(Self {
            bytes,
            document_xml,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn document_xml(&self) -> &str {
        &self.document_xml
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Rebuilds the package with `xml` as the document entry. Other entries are
    /// raw-copied in their original order without recompression.
    pub fn with_document_xml(&self, xml: &str) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(self.bytes.len())));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            if entry.name() == DOCUMENT_ENTRY {
                drop(entry);
                writer.start_file(DOCUMENT_ENTRY, options)?;
                writer.write_all(xml.as_bytes())?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn read_entry_bytes(package: &[u8], name: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocxError::MissingEntry(name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut raw = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or_default());
    entry.read_to_end(&mut raw)?;
    Ok(raw)
}

/// Builds a package from `(path, contents)` pairs, deflating each entry.
pub fn write_package(entries: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in entries {
        writer.start_file(*name, options)?;
        writer.write_all(contents.as_bytes())?;
    }
    Ok(writer.finish()?.into_inner())
}
