use serde::Serialize;
use std::collections::BTreeMap;

/// Number of school days covered by a timetable (Monday to Saturday).
pub const DAYS: usize = 6;

/// Number of periods per day, including the early-morning period 0.
pub const PERIODS: usize = 9;

/// One timetable cell: course name mapped to the IDs attached to it.
pub type Cell = BTreeMap<String, Vec<String>>;

/// A validated `(day, period)` coordinate into a [`WeeklyGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: usize,
    pub period: usize,
}

impl Slot {
    /// Returns `None` when either coordinate falls outside the grid.
    pub fn new(day: usize, period: usize) -> Option<Self> {
        (day < DAYS && period < PERIODS).then_some(Self { day, period })
    }
}

/// Fixed 6 x 9 weekly timetable. Every cell exists from construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklyGrid {
    cells: [[Cell; PERIODS]; DAYS],
}

impl Default for WeeklyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl WeeklyGrid {
    /// Builds a fresh grid of empty cells. Each call owns its own cells.
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| Cell::new())),
        }
    }

    pub fn cell(&self, slot: Slot) -> &Cell {
        &self.cells[slot.day][slot.period]
    }

    /// Appends `id` under `course` and re-sorts the list.
    ///
    /// Duplicates are kept: two identical inserts leave the ID twice, adjacent.
    pub fn insert(&mut self, slot: Slot, course: &str, id: &str) {
        let ids = self.course_entry(slot, course);
        ids.push(id.to_string());
        ids.sort();
    }

    /// Makes sure `course` is listed in the cell without attaching an ID.
    pub fn touch(&mut self, slot: Slot, course: &str) {
        self.course_entry(slot, course);
    }

    fn course_entry(&mut self, slot: Slot, course: &str) -> &mut Vec<String> {
        self.cells[slot.day][slot.period]
            .entry(course.to_string())
            .or_default()
    }

    /// Iterates every cell in day-major order along with its slot.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(day, periods)| {
            periods
                .iter()
                .enumerate()
                .map(move |(period, cell)| (Slot { day, period }, cell))
        })
    }

    /// Counts occupied cells, i.e. cells holding at least one course.
    pub fn occupied(&self) -> usize {
        self.iter().filter(|(_, cell)| !cell.is_empty()).count()
    }
}
