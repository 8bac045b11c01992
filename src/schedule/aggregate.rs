use std::collections::btree_map::Entry;
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::schedule::grid::Slot;
use crate::schedule::types::{Class, Schedule, Teacher, VACANT_TEACHER_ID};

/// Column positions in an exported schedule row.
pub mod columns {
    pub const CLASS_ID: usize = 0;
    pub const CLASS_NUM: usize = 1;
    pub const DAY: usize = 2;
    pub const PERIOD: usize = 3;
    pub const COURSE: usize = 5;
    pub const TEACHER_ID: usize = 9;
    pub const TEACHER_NAME: usize = 10;
}

/// What happened to a single row fed to [`ScheduleBuilder::push_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted,
    Skipped,
}

/// Incrementally folds schedule rows into a [`Schedule`].
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    schedule: Schedule,
    accepted: usize,
    skipped: usize,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one data row. `row` is only used in log fields and errors.
    ///
    /// Rows whose class number is not a plain non-negative integer are
    /// skipped. Missing trailing cells read as empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error if an accepted row has a day or period that is not a
    /// number or falls outside the weekly grid.
    pub fn push_row<S: AsRef<str>>(
        &mut self,
        row: usize,
        cells: &[S],
    ) -> Result<RowOutcome, ScheduleError> {
        let field = |idx: usize| cells.get(idx).map(AsRef::<str>::as_ref).unwrap_or("");

        let raw_num = field(columns::CLASS_NUM);
        let Some(class_num) = parse_class_num(row, raw_num) else {
            debug!(row, class_num = raw_num, "Skipping row without a class number");
            self.skipped += 1;
            return Ok(RowOutcome::Skipped);
        };

        let day = parse_index(row, "day", field(columns::DAY))?;
        let period = parse_index(row, "period", field(columns::PERIOD))?;
        let slot = Slot::new(day, period).ok_or(ScheduleError::SlotOutOfRange {
            row,
            day,
            period,
        })?;

        let class_id = field(columns::CLASS_ID);
        let course = field(columns::COURSE);
        let teacher_id = field(columns::TEACHER_ID);
        let vacant = teacher_id.is_empty() || teacher_id == VACANT_TEACHER_ID;

        let class = match self.schedule.classes.entry(class_id.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                if let Some(previous) = self
                    .schedule
                    .class_index
                    .insert(class_num, class_id.to_string())
                {
                    warn!(class_num, previous = %previous, class_id, "Class number reused");
                }
                e.insert(Class::new(class_id, class_num))
            }
        };

        let teacher = if vacant {
            self.schedule.vacancies.get_or_insert_with(Teacher::vacant)
        } else {
            self.schedule
                .teachers
                .entry(teacher_id.to_string())
                .or_insert_with(|| Teacher::new(teacher_id, field(columns::TEACHER_NAME)))
        };

        // An unstaffed course still shows on the class page, just without a teacher.
        if vacant {
            class.courses.touch(slot, course);
        } else {
            class.courses.insert(slot, course, teacher_id);
        }
        teacher.courses.insert(slot, course, class_id);

        self.accepted += 1;
        Ok(RowOutcome::Accepted)
    }

    pub fn finish(self) -> Schedule {
        info!(
            accepted = self.accepted,
            skipped = self.skipped,
            classes = self.schedule.classes.len(),
            teachers = self.schedule.teachers.len(),
            vacancies = self.schedule.vacancies.is_some(),
            "Schedule aggregated"
        );
        self.schedule
    }
}

/// Builds a [`Schedule`] from spreadsheet rows. The first row is the header
/// and is always skipped.
///
/// # Errors
///
/// Stops at the first row with an unusable day or period; nothing is returned
/// for the rows before it.
#[tracing::instrument(skip_all)]
pub fn aggregate<I, R>(rows: I) -> Result<Schedule, ScheduleError>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut builder = ScheduleBuilder::new();
    for (row, cells) in rows.into_iter().enumerate().skip(1) {
        builder.push_row(row, cells.as_ref())?;
    }
    Ok(builder.finish())
}

fn parse_class_num(row: usize, raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.parse() {
        Ok(num) => Some(num),
        Err(_) => {
            warn!(row, class_num = raw, "Class number does not fit, skipping row");
            None
        }
    }
}

fn parse_index(row: usize, field: &'static str, raw: &str) -> Result<usize, ScheduleError> {
    raw.trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidField {
            row,
            field,
            value: raw.to_string(),
        })
}
