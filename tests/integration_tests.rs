use std::collections::BTreeSet;
use std::io::{Cursor, Read};
use timetable_pages::config::ConvertOptions;
use timetable_pages::convert::{build_schedule, convert, convert_at};
use timetable_pages::reader::SourceFormat;
use timetable_pages::render::Renderer;
use timetable_pages::schedule::Slot;
use zip::ZipArchive;

const SAMPLE: &[u8] = include_bytes!("fixtures/sample_schedule.csv");

fn archive_names(bytes: Vec<u8>) -> BTreeSet<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to open archive");
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_full_pipeline() {
    let archive = convert(
        SAMPLE,
        SourceFormat::Csv,
        &ConvertOptions::default(),
        &Renderer::default(),
    )
    .expect("Failed to convert sample");

    let expected: BTreeSet<String> = [
        "C101.HTML",
        "C102.HTML",
        "C201.HTML",
        "TA001.HTML",
        "TB010.HTML",
        "TC001.HTML",
        "TC003.HTML",
        "TD002.HTML",
        "TG005.HTML",
        "TJ002.HTML",
        "TX100.HTML",
        "_ClassIndex.html",
        "_TeachIndex.html",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    assert_eq!(archive_names(archive), expected);
}

#[test]
fn test_sample_schedule_contents() {
    let schedule = build_schedule(SAMPLE, SourceFormat::Csv, &ConvertOptions::default())
        .expect("Failed to aggregate sample");

    let math = Slot::new(0, 2).unwrap();
    assert_eq!(
        schedule.classes["101"].courses.cell(math)["數學"],
        vec!["C001", "C003"]
    );
    assert_eq!(
        schedule.teachers["C003"].courses.cell(math)["數學"],
        vec!["101", "102"]
    );

    let history = Slot::new(5, 3).unwrap();
    assert_eq!(
        schedule.classes["201"].courses.cell(history)["歷史"],
        vec!["D002", "D002"]
    );

    let morning = Slot::new(2, 0).unwrap();
    assert!(schedule.classes["101"].courses.cell(morning)["早自習"].is_empty());
    let vacancies = schedule.vacancies.as_ref().expect("Expected unstaffed slots");
    assert_eq!(vacancies.courses.cell(morning)["早自習"], vec!["101"]);

    assert_eq!(schedule.teachers.len(), 8);
    assert_eq!(schedule.class_index.len(), 3);
}

#[test]
fn test_teacher_index_groups_departments() {
    let archive = convert_at(
        SAMPLE,
        SourceFormat::Csv,
        &ConvertOptions::default(),
        &Renderer::default(),
        "2024/09/01 08:00:00",
    )
    .unwrap();

    let mut archive = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut index = String::new();
    archive
        .by_name("_TeachIndex.html")
        .unwrap()
        .read_to_string(&mut index)
        .unwrap();

    let math = index.find("數學科").unwrap();
    let external = index.find("外聘教師").unwrap();
    assert!(math < index.find("林志明").unwrap());
    assert!(external < index.find("山田太郎").unwrap());
    assert!(!index.contains("Tempty.HTML"));
    assert!(index.contains("2024/09/01 08:00:00"));
}

#[test]
fn test_same_input_same_archive() {
    let options = ConvertOptions::default();
    let renderer = Renderer::default();
    let first = convert_at(SAMPLE, SourceFormat::Csv, &options, &renderer, "fixed").unwrap();
    let second = convert_at(SAMPLE, SourceFormat::Csv, &options, &renderer, "fixed").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_csv_bytes_read_as_xls_fail() {
    let result = convert(
        SAMPLE,
        SourceFormat::Xls,
        &ConvertOptions::default(),
        &Renderer::default(),
    );
    assert!(result.is_err());
}
