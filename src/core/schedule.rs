use crate::core::duration::calculate_duration;
use crate::core::{Enrollment, Row, ScheduleRecord, Table};

pub const COURSE_COLUMN: &str = "COURSE";
pub const INSTRUCTOR_COLUMN: &str = "INSTRUCTOR";
pub const DAYS_COLUMN: &str = "DAYS";
pub const TIME_COLUMN: &str = "TIME";
pub const LOCATION_COLUMN: &str = "LOCATION";
pub const TYPE_COLUMN: &str = "TYPE";
pub const NOTES_COLUMN: &str = "NOTES";
pub const ENROLL_COLUMN: &str = "ENROLL";

pub const UNSCHEDULED_TIME: &str = "Online/Asynchronous";

const DEFAULT_INSTRUCTORS: &str = "TBD";
const DEFAULT_TIME_OF_DAY: &str = "TBD";
const DEFAULT_LOCATION: &str = "TBD";
const DEFAULT_TYPE: &str = "N/A";

/// Reshapes schedule rows into [`ScheduleRecord`]s, keeping row order.
///
/// Rows without a course number are dropped. Rows whose time range cannot be
/// parsed are kept as online/asynchronous offerings with no meeting days.
pub fn normalize_schedule(table: &Table) -> Vec<ScheduleRecord> {
    let mut records = Vec::with_capacity(table.rows.len());

    for (index, row) in table.rows.iter().enumerate() {
        match normalize_row(row) {
            Some(record) => records.push(record),
            None => tracing::debug!(
                "Dropping row {} of '{}': no {} value",
                index + 1,
                table.sheet,
                COURSE_COLUMN
            ),
        }
    }

    records
}

fn normalize_row(row: &Row) -> Option<ScheduleRecord> {
    let course_number = row.non_empty(COURSE_COLUMN)?.to_string();

    let duration = calculate_duration(row.get(TIME_COLUMN));

    let (days, time_of_day) = match duration {
        Some(_) => (row.get(DAYS_COLUMN), row.get(TIME_COLUMN)),
        None => (Some(""), Some(UNSCHEDULED_TIME)),
    };

    Some(ScheduleRecord {
        course_number,
        instructors: or_default(row.get(INSTRUCTOR_COLUMN), DEFAULT_INSTRUCTORS),
        days: or_default(days, ""),
        time_of_day: or_default(time_of_day, DEFAULT_TIME_OF_DAY),
        duration: duration.unwrap_or(0),
        location: or_default(row.get(LOCATION_COLUMN), DEFAULT_LOCATION),
        kind: or_default(row.get(TYPE_COLUMN), DEFAULT_TYPE),
        notes: or_default(row.get(NOTES_COLUMN), ""),
        anticipated_enrollment: Enrollment::from_cell(row.get(ENROLL_COLUMN)),
    })
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}
