//! HTML rendering of timetable pages.
//!
//! A [`Renderer`] is built once at start-up and handed to every conversion by
//! reference. Pages are Maud templates, so interpolated text is escaped.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;

use crate::package::{class_document_name, teacher_document_name};
use crate::schedule::{
    Class, ClassId, DAYS, PERIODS, Schedule, Slot, SubjectBucket, Teacher, TeacherId, WeeklyGrid,
};

/// Display row for one period of the day.
#[derive(Debug, Clone, Copy)]
pub struct PeriodInfo {
    pub label: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

pub static PERIOD_INFO: [PeriodInfo; PERIODS] = [
    PeriodInfo {
        label: "早修",
        start: "0730",
        end: "0800",
    },
    PeriodInfo {
        label: "第一節",
        start: "0800",
        end: "0850",
    },
    PeriodInfo {
        label: "第二節",
        start: "0900",
        end: "0950",
    },
    PeriodInfo {
        label: "第三節",
        start: "1010",
        end: "1100",
    },
    PeriodInfo {
        label: "第四節",
        start: "1110",
        end: "1200",
    },
    PeriodInfo {
        label: "第五節",
        start: "1310",
        end: "1400",
    },
    PeriodInfo {
        label: "第六節",
        start: "1410",
        end: "1500",
    },
    PeriodInfo {
        label: "第七節",
        start: "1510",
        end: "1600",
    },
    PeriodInfo {
        label: "第八節",
        start: "1610",
        end: "1700",
    },
];

pub static DAY_NAMES: [&str; DAYS] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];

pub static GRADE_NAMES: &[&str] = &["高一", "高二", "高三"];

/// The lunch break row is drawn after this period.
const LUNCH_AFTER: usize = 4;

const STYLE: &str = "\
body{font-family:sans-serif;margin:1.5em}\
table.timetable{border-collapse:collapse}\
table.timetable th,table.timetable td{border:1px solid #888;padding:.3em .5em;vertical-align:top;min-width:6em}\
tr.lunch td{text-align:center;background:#eee}\
.course{font-weight:bold}\
.time{font-size:.8em;color:#555}\
footer{margin-top:1em;font-size:.8em;color:#555}";

/// Identifies one of the page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Class,
    Teacher,
    ClassIndex,
    TeacherIndex,
    UploadForm,
}

impl TemplateId {
    pub fn title(self) -> &'static str {
        match self {
            TemplateId::Class => "班級課表",
            TemplateId::Teacher => "教師課表",
            TemplateId::ClassIndex => "班級課表索引",
            TemplateId::TeacherIndex => "教師課表索引",
            TemplateId::UploadForm => "課表轉換",
        }
    }
}

/// Page templates for one school, built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    school: String,
}

impl Renderer {
    pub fn new(school: impl Into<String>) -> Self {
        Self {
            school: school.into(),
        }
    }

    pub fn class_page(
        &self,
        class: &Class,
        teachers: &BTreeMap<TeacherId, Teacher>,
        timestamp: &str,
    ) -> String {
        let title = TemplateId::Class.title();
        let body = html! {
            h1 { (class.class_id) " " (title) }
            p { a href=(crate::package::CLASS_INDEX_NAME) { (TemplateId::ClassIndex.title()) } }
            (self.timetable(&class.courses, |course, teacher_ids| html! {
                div.entry {
                    span.course { (course) }
                    @for teacher_id in teacher_ids {
                        " "
                        @let name = teachers
                            .get(teacher_id)
                            .map(|t| t.name.as_str())
                            .filter(|n| !n.is_empty())
                            .unwrap_or(teacher_id.as_str());
                        a href=(teacher_document_name(teacher_id)) { (name) }
                    }
                }
            }))
        };
        self.page(&format!("{} {}", class.class_id, title), timestamp, body)
    }

    pub fn teacher_page(
        &self,
        teacher: &Teacher,
        classes: &BTreeMap<ClassId, Class>,
        timestamp: &str,
    ) -> String {
        let title = TemplateId::Teacher.title();
        let body = html! {
            h1 { (teacher.name) " (" (teacher.teacher_id) ") " (title) }
            p { a href=(crate::package::TEACHER_INDEX_NAME) { (TemplateId::TeacherIndex.title()) } }
            (self.timetable(&teacher.courses, |course, class_ids| html! {
                div.entry {
                    span.course { (course) }
                    @for class_id in class_ids {
                        " "
                        @if classes.contains_key(class_id) {
                            a href=(class_document_name(class_id)) { (class_id) }
                        } @else {
                            (class_id)
                        }
                    }
                }
            }))
        };
        self.page(&format!("{} {}", teacher.name, title), timestamp, body)
    }

    /// Lists classes grouped by grade, ordered by class number.
    pub fn class_index(&self, schedule: &Schedule, timestamp: &str) -> String {
        let mut grades: BTreeMap<u64, Vec<&Class>> = BTreeMap::new();
        for class_id in schedule.class_index.values() {
            if let Some(class) = schedule.classes.get(class_id) {
                grades.entry(class.grade()).or_default().push(class);
            }
        }

        let title = TemplateId::ClassIndex.title();
        let body = html! {
            h1 { (title) }
            @for (grade, classes) in &grades {
                h2 { (grade_name(*grade)) }
                ul.classes {
                    @for class in classes {
                        li {
                            a href=(class_document_name(&class.class_id)) { (class.class_id) }
                            " "
                            span.seat { "第 " (class.seat()) " 班" }
                        }
                    }
                }
            }
        };
        self.page(title, timestamp, body)
    }

    /// Lists teachers by department bucket.
    pub fn teacher_index(
        &self,
        buckets: &[SubjectBucket],
        teachers: &BTreeMap<TeacherId, Teacher>,
        timestamp: &str,
    ) -> String {
        let title = TemplateId::TeacherIndex.title();
        let body = html! {
            h1 { (title) }
            @for bucket in buckets {
                @if !bucket.teacher_ids.is_empty() {
                    h2 { (bucket.name) }
                    ul.teachers {
                        @for teacher_id in &bucket.teacher_ids {
                            li {
                                a href=(teacher_document_name(teacher_id)) {
                                    @match teachers.get(teacher_id) {
                                        Some(t) if !t.name.is_empty() => { (t.name) }
                                        _ => { (teacher_id) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };
        self.page(title, timestamp, body)
    }

    pub fn upload_form(&self) -> String {
        let title = TemplateId::UploadForm.title();
        html! {
            (DOCTYPE)
            html lang="zh-Hant" {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { (self.school) " " (title) }
                    form method="post" enctype="multipart/form-data" {
                        input type="file" name="file" accept=".xls,.xlsx,.csv";
                        " "
                        button type="submit" { "轉換並下載" }
                    }
                }
            }
        }
        .into_string()
    }

    fn timetable<F>(&self, grid: &WeeklyGrid, entry: F) -> Markup
    where
        F: Fn(&str, &[String]) -> Markup,
    {
        html! {
            table.timetable {
                thead {
                    tr {
                        th { "節次" }
                        @for day in DAY_NAMES { th { (day) } }
                    }
                }
                tbody {
                    @for (period, info) in PERIOD_INFO.iter().enumerate() {
                        tr {
                            th {
                                (info.label)
                                br;
                                span.time { (info.start) "-" (info.end) }
                            }
                            @for day in 0..DAYS {
                                td {
                                    @if let Some(slot) = Slot::new(day, period) {
                                        @for (course, ids) in grid.cell(slot) {
                                            (entry(course.as_str(), ids.as_slice()))
                                        }
                                    }
                                }
                            }
                        }
                        @if period == LUNCH_AFTER {
                            tr.lunch { td colspan=(DAYS + 1) { "午休" } }
                        }
                    }
                }
            }
        }
    }

    fn page(&self, title: &str, timestamp: &str, body: Markup) -> String {
        html! {
            (DOCTYPE)
            html lang="zh-Hant" {
                head {
                    meta charset="utf-8";
                    title { (self.school) " " (title) }
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    (body)
                    footer { "更新時間：" (timestamp) }
                }
            }
        }
        .into_string()
    }
}

fn grade_name(grade: u64) -> String {
    grade
        .checked_sub(1)
        .and_then(|i| GRADE_NAMES.get(i as usize))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("{grade} 年級"))
}
