//! Schedule aggregation.
//!
//! Folds exported timetable rows into two cross-indexed views: every class
//! with its weekly grid of course → teachers, and every teacher with their
//! weekly grid of course → classes.

pub mod aggregate;
pub mod grid;
pub mod subjects;
pub mod types;

pub use aggregate::{RowOutcome, ScheduleBuilder, aggregate};
pub use grid::{Cell, DAYS, PERIODS, Slot, WeeklyGrid};
pub use subjects::{SubjectBucket, SubjectGroup, SubjectTable};
pub use types::{Class, ClassId, Schedule, Teacher, TeacherId, VACANT_TEACHER_ID};
