//! Grouping of teachers into subject departments for the teacher index.
//!
//! Teacher IDs encode their department in the first letter. The mapping is a
//! small table that can be replaced by a JSON file:
//!
//! ```json
//! {
//!   "groups": [
//!     { "name": "國文科", "prefixes": ["A"] },
//!     { "name": "社會科", "prefixes": ["D", "E", "F"] }
//!   ],
//!   "fallback": "外聘教師"
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::schedule::types::TeacherId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGroup {
    pub name: String,
    pub prefixes: Vec<char>,
}

/// A department and the teachers classified into it, IDs ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectBucket {
    pub name: String,
    pub teacher_ids: Vec<TeacherId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectTable {
    groups: Vec<SubjectGroup>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    "外聘教師".to_string()
}

static DEFAULT_GROUPS: &[(&str, &[char])] = &[
    ("國文科", &['A']),
    ("英文科", &['B']),
    ("數學科", &['C']),
    ("社會科", &['D', 'E', 'F']),
    ("自然科", &['G', 'H', 'I']),
    ("藝能科", &['J', 'K', 'L']),
];

impl Default for SubjectTable {
    fn default() -> Self {
        Self {
            groups: DEFAULT_GROUPS
                .iter()
                .map(|(name, prefixes)| SubjectGroup {
                    name: name.to_string(),
                    prefixes: prefixes.to_vec(),
                })
                .collect(),
            fallback: default_fallback(),
        }
    }
}

impl SubjectTable {
    /// Loads a table from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading subject table {}", path.display()))?;
        let table: SubjectTable = serde_json::from_str(&content)
            .with_context(|| format!("parsing subject table {}", path.display()))?;
        Ok(table)
    }

    /// Position of the department for `teacher_id`; `None` means the catch-all.
    fn group_index(&self, teacher_id: &str) -> Option<usize> {
        let first = teacher_id.chars().next()?;
        self.groups.iter().position(|g| g.prefixes.contains(&first))
    }

    /// Sorts teacher IDs into one bucket per group, followed by the catch-all
    /// bucket. Empty IDs are dropped; IDs are ascending within each bucket.
    pub fn classify<'a, I>(&self, teacher_ids: I) -> Vec<SubjectBucket>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ids: Vec<&str> = teacher_ids.into_iter().filter(|id| !id.is_empty()).collect();
        ids.sort_unstable();

        let mut buckets: Vec<SubjectBucket> = self
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .map(|name| SubjectBucket {
                name: name.to_string(),
                teacher_ids: Vec::new(),
            })
            .collect();
        let fallback = buckets.len() - 1;

        for id in ids {
            let index = self.group_index(id).unwrap_or(fallback);
            buckets[index].teacher_ids.push(id.to_string());
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_has_seven_buckets() {
        let buckets = SubjectTable::default().classify(std::iter::empty());
        let names: Vec<_> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "國文科",
                "英文科",
                "數學科",
                "社會科",
                "自然科",
                "藝能科",
                "外聘教師"
            ]
        );
    }

    #[test]
    fn test_first_letter_picks_department() {
        let table = SubjectTable::default();
        assert_eq!(table.group_index("A012"), Some(0));
        assert_eq!(table.group_index("E003"), Some(3));
        assert_eq!(table.group_index("L100"), Some(5));
        assert_eq!(table.group_index("Z001"), None);
        assert_eq!(table.group_index("a001"), None);
        assert_eq!(table.group_index(""), None);
    }

    #[test]
    fn test_classify_sorts_and_buckets() {
        let table = SubjectTable::default();
        let buckets = table.classify(["H002", "X900", "G001", "", "A001", "H001"]);

        assert_eq!(buckets[0].teacher_ids, vec!["A001"]);
        assert_eq!(buckets[4].teacher_ids, vec!["G001", "H001", "H002"]);
        assert_eq!(buckets[6].teacher_ids, vec!["X900"]);
        let total: usize = buckets.iter().map(|b| b.teacher_ids.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"groups": [{{"name": "Languages", "prefixes": ["A", "B"]}}]}}"#
        )
        .unwrap();

        let table = SubjectTable::load(file.path()).unwrap();
        let buckets = table.classify(["B001", "C001"]);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].name, "Languages");
        assert_eq!(buckets[0].teacher_ids, vec!["B001"]);
        assert_eq!(buckets[1].name, "外聘教師");
        assert_eq!(buckets[1].teacher_ids, vec!["C001"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = SubjectTable::load(Path::new("/nonexistent/subjects.json"));
        assert!(result.is_err());
    }
}
