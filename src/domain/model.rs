use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Raw two-dimensional table as fetched, header not yet identified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub sheet: String,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(sheet: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            sheet: sheet.into(),
            rows,
        }
    }
}

/// One data row keyed by column name, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, replacing the value of an existing column of the same name
    /// in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// `None` when the column is absent from this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `column`, treating absent and whitespace-only cells alike.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|value| !value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Rows found beneath a located header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub sheet: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|name| name == column)
    }
}

/// Enrollment cell passed through as the sheet's text ("36", "10-15"). Only an
/// empty cell becomes the number `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Enrollment {
    Count(u64),
    Text(String),
}

impl Enrollment {
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell.filter(|value| !value.trim().is_empty()) {
            None => Enrollment::Count(0),
            Some(value) => Enrollment::Text(value.to_string()),
        }
    }
}

impl Default for Enrollment {
    fn default() -> Self {
        Enrollment::Count(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub course_number: String,
    pub instructors: String,
    pub days: String,
    pub time_of_day: String,
    pub duration: i64,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
    pub anticipated_enrollment: Enrollment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    pub fn code(self) -> &'static str {
        match self {
            Season::Spring => "SP",
            Season::Fall => "FA",
        }
    }
}

/// Semester tag plus calendar year, rendered as e.g. `FA26`.
///
/// Ordering looks at the two-digit suffix only (so `FA00` sorts before `FA99`
/// regardless of century), with spring ahead of fall within the same suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermCode {
    pub season: Season,
    pub year: i32,
}

impl TermCode {
    pub fn fall(year: i32) -> Self {
        Self {
            season: Season::Fall,
            year,
        }
    }

    pub fn spring(year: i32) -> Self {
        Self {
            season: Season::Spring,
            year,
        }
    }

    pub fn suffix(&self) -> i32 {
        self.year.rem_euclid(100)
    }
}

impl Ord for TermCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.suffix()
            .cmp(&other.suffix())
            .then_with(|| self.season.cmp(&other.season))
            .then_with(|| self.year.cmp(&other.year))
    }
}

impl PartialOrd for TermCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.season.code(), self.suffix())
    }
}

impl Serialize for TermCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const PREDICTED_SCHEDULE_FIELD: &str = "predicted_schedule";
pub const NEXT_OFFERING_FIELD: &str = "Next Offering";
pub const ON_DEMAND: &str = "On Demand";

/// An elective row passed through with its forecast attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectiveRecord {
    pub columns: Row,
    pub predicted_schedule: Vec<TermCode>,
    pub next_offering: String,
}

impl Serialize for ElectiveRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let passthrough: Vec<(&str, &str)> = self
            .columns
            .iter()
            .filter(|(name, _)| *name != PREDICTED_SCHEDULE_FIELD && *name != NEXT_OFFERING_FIELD)
            .collect();

        let mut map = serializer.serialize_map(Some(passthrough.len() + 2))?;
        for (name, value) in passthrough {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(PREDICTED_SCHEDULE_FIELD, &self.predicted_schedule)?;
        map.serialize_entry(NEXT_OFFERING_FIELD, &self.next_offering)?;
        map.end()
    }
}

/// Names one worksheet inside one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRef {
    pub spreadsheet: String,
    pub worksheet: String,
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.spreadsheet, self.worksheet)
    }
}

/// Entry of the semester index the schedule page loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterManifestEntry {
    pub display_title: String,
    pub data_file: String,
}
