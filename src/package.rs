//! Packs rendered documents into a downloadable zip archive.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::PackageError;

pub const CLASS_INDEX_NAME: &str = "_ClassIndex.html";
pub const TEACHER_INDEX_NAME: &str = "_TeachIndex.html";

pub fn class_document_name(class_id: &str) -> String {
    format!("C{class_id}.HTML")
}

pub fn teacher_document_name(teacher_id: &str) -> String {
    format!("T{teacher_id}.HTML")
}

/// A named text blob destined for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub body: String,
}

impl Document {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Writes `documents` into a deflate-compressed zip, in order.
///
/// # Errors
///
/// Fails on a repeated document name or if the zip writer fails.
#[tracing::instrument(skip_all, fields(documents = documents.len()))]
pub fn package(documents: &[Document]) -> Result<Vec<u8>, PackageError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut seen = HashSet::new();

    for doc in documents {
        if !seen.insert(doc.name.as_str()) {
            return Err(PackageError::Duplicate(doc.name.clone()));
        }
        zip.start_file(doc.name.as_str(), options)?;
        zip.write_all(doc.body.as_bytes())?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(bytes = bytes.len(), "Archive written");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_document_names() {
        assert_eq!(class_document_name("101"), "C101.HTML");
        assert_eq!(teacher_document_name("A001"), "TA001.HTML");
    }

    #[test]
    fn test_package_contains_documents() {
        let docs = vec![
            Document::new("C101.HTML", "<p>101</p>"),
            Document::new("TA001.HTML", "<p>國文</p>"),
        ];
        let bytes = package(&docs).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut body = String::new();
        archive
            .by_name("TA001.HTML")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "<p>國文</p>");
    }

    #[test]
    fn test_package_empty() {
        let bytes = package(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_package_rejects_duplicates() {
        let docs = vec![Document::new("C1.HTML", "a"), Document::new("C1.HTML", "b")];
        let err = package(&docs).unwrap_err();
        assert!(matches!(err, PackageError::Duplicate(name) if name == "C1.HTML"));
    }
}
