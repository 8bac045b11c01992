//! Error types for each stage of the conversion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("XLS read error: {0}")]
    Xls(#[from] calamine::XlsError),

    #[error("XLSX read error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("row {row}: {field} is not a number: {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: day {day} / period {period} is outside the weekly grid")]
    SlotOutOfRange {
        row: usize,
        day: usize,
        period: usize,
    },
}

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Duplicate document name: {0}")]
    Duplicate(String),
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Package(#[from] PackageError),
}
