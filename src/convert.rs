//! One upload in, one archive out.

use chrono::Local;
use tracing::info;

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::package::{
    CLASS_INDEX_NAME, Document, TEACHER_INDEX_NAME, class_document_name, package,
    teacher_document_name,
};
use crate::reader::{SourceFormat, read_rows};
use crate::render::Renderer;
use crate::schedule::{Schedule, aggregate};

/// Format of the "last updated" line printed on every page.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Reads and aggregates an uploaded export.
pub fn build_schedule(
    bytes: &[u8],
    format: SourceFormat,
    options: &ConvertOptions,
) -> Result<Schedule, ConvertError> {
    let rows = read_rows(bytes, format, &options.sheet_name)?;
    Ok(aggregate(rows)?)
}

/// Renders one page per class, one per teacher and, optionally, the two
/// index pages. The placeholder teacher for unstaffed slots gets no page.
pub fn render_documents(
    schedule: &Schedule,
    options: &ConvertOptions,
    renderer: &Renderer,
    timestamp: &str,
) -> Vec<Document> {
    let mut documents = Vec::with_capacity(schedule.classes.len() + schedule.teachers.len() + 2);

    for (class_id, class) in &schedule.classes {
        documents.push(Document::new(
            class_document_name(class_id),
            renderer.class_page(class, &schedule.teachers, timestamp),
        ));
    }

    for (teacher_id, teacher) in &schedule.teachers {
        documents.push(Document::new(
            teacher_document_name(teacher_id),
            renderer.teacher_page(teacher, &schedule.classes, timestamp),
        ));
    }

    if options.include_indexes {
        documents.push(Document::new(
            CLASS_INDEX_NAME,
            renderer.class_index(schedule, timestamp),
        ));

        let buckets = options
            .subjects
            .classify(schedule.teachers.keys().map(String::as_str));
        documents.push(Document::new(
            TEACHER_INDEX_NAME,
            renderer.teacher_index(&buckets, &schedule.teachers, timestamp),
        ));
    }

    documents
}

/// Converts an uploaded export into a zip of timetable pages stamped with the
/// current local time.
///
/// # Errors
///
/// Fails as a whole on an unreadable upload, a missing sheet, a row with an
/// unusable day or period, or an archive write failure.
pub fn convert(
    bytes: &[u8],
    format: SourceFormat,
    options: &ConvertOptions,
    renderer: &Renderer,
) -> Result<Vec<u8>, ConvertError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    convert_at(bytes, format, options, renderer, &timestamp)
}

/// Same as [`convert`] with a caller-supplied timestamp.
#[tracing::instrument(skip(bytes, options, renderer), fields(bytes = bytes.len()))]
pub fn convert_at(
    bytes: &[u8],
    format: SourceFormat,
    options: &ConvertOptions,
    renderer: &Renderer,
    timestamp: &str,
) -> Result<Vec<u8>, ConvertError> {
    let schedule = build_schedule(bytes, format, options)?;
    let documents = render_documents(&schedule, options, renderer, timestamp);
    let archive = package(&documents)?;

    info!(
        documents = documents.len(),
        archive_bytes = archive.len(),
        "Conversion complete"
    );
    Ok(archive)
}
