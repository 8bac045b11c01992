//! Reads uploaded timetable exports into rows of cell text.
//!
//! Spreadsheets go through calamine; CSV exports through the csv crate. Both
//! yield every row including the header, which the aggregator skips.

use calamine::{Data, Reader, Xls, Xlsx, open_workbook_from_rs};
use clap::ValueEnum;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

use crate::error::ReadError;

/// Container format of an uploaded export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceFormat {
    #[default]
    Xls,
    Xlsx,
    Csv,
}

impl SourceFormat {
    /// Picks the format from a file name's extension, falling back to legacy XLS.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" => SourceFormat::Xlsx,
            "csv" => SourceFormat::Csv,
            _ => SourceFormat::Xls,
        }
    }
}

/// Reads all rows of `sheet` (ignored for CSV) from an in-memory upload.
///
/// # Errors
///
/// Returns an error if the container is corrupt or the sheet does not exist.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn read_rows(
    bytes: &[u8],
    format: SourceFormat,
    sheet: &str,
) -> Result<Vec<Vec<String>>, ReadError> {
    let rows = match format {
        SourceFormat::Xls => {
            let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(bytes))?;
            sheet_rows(&mut workbook, sheet)?
        }
        SourceFormat::Xlsx => {
            let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
            sheet_rows(&mut workbook, sheet)?
        }
        SourceFormat::Csv => csv_rows(bytes)?,
    };
    debug!(rows = rows.len(), "Rows read");
    Ok(rows)
}

fn sheet_rows<RS, R>(workbook: &mut R, sheet: &str) -> Result<Vec<Vec<String>>, ReadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    ReadError: From<R::Error>,
{
    ensure_sheet(&workbook.sheet_names(), sheet)?;
    let range = workbook.worksheet_range(sheet)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn ensure_sheet(names: &[String], sheet: &str) -> Result<(), ReadError> {
    if names.iter().any(|name| name == sheet) {
        Ok(())
    } else {
        Err(ReadError::SheetNotFound(sheet.to_string()))
    }
}

fn csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, ReadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Renders a cell as the text the aggregator expects.
///
/// Whole-number floats lose their fraction so that `1.0` reads as `"1"`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => format!("{:?}", e),
    }
}
