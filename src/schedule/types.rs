//! Entities produced by the aggregation pass.

use serde::Serialize;
use std::collections::BTreeMap;

use super::grid::WeeklyGrid;

pub type ClassId = String;
pub type TeacherId = String;

/// ID given to the placeholder teacher that collects unstaffed slots.
///
/// The ID is reserved: rows that carry it are treated as unstaffed.
pub const VACANT_TEACHER_ID: &str = "empty";

/// A class section and its timetable of course → teacher IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    pub class_id: ClassId,
    pub class_num: u64,
    pub courses: WeeklyGrid,
}

impl Class {
    pub fn new(class_id: &str, class_num: u64) -> Self {
        Self {
            class_id: class_id.to_string(),
            class_num,
            courses: WeeklyGrid::new(),
        }
    }

    /// School year encoded in the hundreds of the class number (`203` → 2).
    pub fn grade(&self) -> u64 {
        self.class_num / 100
    }

    /// Position of the class within its grade (`203` → 3).
    pub fn seat(&self) -> u64 {
        self.class_num % 100
    }
}

/// A teacher and their timetable of course → class IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub teacher_id: TeacherId,
    pub name: String,
    pub courses: WeeklyGrid,
}

impl Teacher {
    pub fn new(teacher_id: &str, name: &str) -> Self {
        Self {
            teacher_id: teacher_id.to_string(),
            name: name.to_string(),
            courses: WeeklyGrid::new(),
        }
    }

    pub fn vacant() -> Self {
        Self::new(VACANT_TEACHER_ID, "")
    }
}

/// Result of one aggregation pass.
///
/// The placeholder teacher lives in `vacancies`, outside `teachers`, so it can
/// never be rendered as a page or listed in an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub classes: BTreeMap<ClassId, Class>,
    pub teachers: BTreeMap<TeacherId, Teacher>,
    pub class_index: BTreeMap<u64, ClassId>,
    pub vacancies: Option<Teacher>,
}
