use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

const TIME_FORMAT: &str = "%I:%M %p";

static GLUED_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^\s])(am|pm)$").unwrap());

/// Length in minutes of a time range such as `"9:00AM-10:15AM"`.
///
/// `None` for a missing value, `"TBA"`, a string without `-`, or when either
/// side is not a 12-hour clock time. Ranges are assumed to fall on one day:
/// an end before the start yields a negative count.
pub fn calculate_duration(time_range: Option<&str>) -> Option<i64> {
    let time_range = time_range?.trim();
    if time_range == "TBA" {
        return None;
    }

    let (start, end) = time_range.split_once('-')?;
    let start = parse_clock_time(start)?;
    let end = parse_clock_time(end)?;

    Some(end.signed_duration_since(start).num_minutes())
}

fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = GLUED_MERIDIEM.replace(value.trim(), "$1 $2");
    NaiveTime::parse_from_str(&value, TIME_FORMAT).ok()
}
