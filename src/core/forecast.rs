//! Elective offering forecast.
//!
//! Each elective row carries a human-entered recurrence label ("Fall - Even
//! Years", "Every Other Year (Spring)", ...) and optionally a free-text "Last
//! Offered" value. Labels are matched by substring, so decorated labels such as
//! "Fall - Every (tentative)" still match.

use crate::core::{ElectiveRecord, Row, Table, TermCode, ON_DEMAND};
use crate::utils::error::RowPredictionError;
use std::collections::BTreeSet;

pub const FREQUENCY_COLUMN: &str = "Offering Frequency";
pub const LAST_OFFERED_COLUMN: &str = "Last Offered";
pub const DEFAULT_PREDICTION_YEARS: u32 = 5;

const FALL_EVERY: &str = "Fall - Every";
const FALL_EVEN: &str = "Fall - Even Years";
const FALL_ODD: &str = "Fall - Odd Years";
const FALL_ALTERNATING: &str = "Every Other Year (Fall)";

const SPRING_EVERY: &str = "Spring - Every";
// Both spellings occur in the sheet.
const SPRING_EVEN: [&str; 2] = ["Spring - Even Years", "Spring -Even Years"];
const SPRING_ODD: &str = "Spring - Odd Years";
const SPRING_ALTERNATING: &str = "Every Other Year (Spring)";

const FALL_AND_SPRING: &str = "Fall and Spring";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSettings {
    /// Years predicted beyond the current one.
    pub prediction_years: u32,
    pub frequency_column: String,
    pub last_offered_column: String,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            prediction_years: DEFAULT_PREDICTION_YEARS,
            frequency_column: FREQUENCY_COLUMN.to_string(),
            last_offered_column: LAST_OFFERED_COLUMN.to_string(),
        }
    }
}

/// Attaches `predicted_schedule` and `Next Offering` to every elective row.
///
/// A row whose prediction fails gets an empty schedule; the rest of the batch
/// is unaffected.
pub fn forecast_electives(
    table: &Table,
    settings: &ForecastSettings,
    current_year: i32,
) -> Vec<ElectiveRecord> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let frequency = row.get(&settings.frequency_column).unwrap_or_default();
            let last_offered = row.get(&settings.last_offered_column).unwrap_or_default();

            let predicted_schedule =
                match predict_terms(frequency, last_offered, current_year, settings.prediction_years) {
                    Ok(terms) => terms,
                    Err(e) => {
                        tracing::warn!(
                            "Prediction failed for row {} of '{}': {}",
                            index + 1,
                            table.sheet,
                            e
                        );
                        Vec::new()
                    }
                };

            build_record(row, predicted_schedule)
        })
        .collect()
}

fn build_record(row: &Row, predicted_schedule: Vec<TermCode>) -> ElectiveRecord {
    let next_offering = predicted_schedule
        .first()
        .map(TermCode::to_string)
        .unwrap_or_else(|| ON_DEMAND.to_string());

    ElectiveRecord {
        columns: row.clone(),
        predicted_schedule,
        next_offering,
    }
}

/// Predicted terms for one recurrence label, ascending and deduplicated.
///
/// Candidate fall years run from `current_year` through
/// `current_year + prediction_years`; each is paired with the spring of the
/// following calendar year. The final filter compares two-digit suffixes only,
/// so terms past a century boundary are dropped.
pub fn predict_terms(
    frequency: &str,
    last_offered: &str,
    current_year: i32,
    prediction_years: u32,
) -> Result<Vec<TermCode>, RowPredictionError> {
    let anchor_year = extract_anchor_year(last_offered)?;
    let fall_anchor = anchor_year.filter(|_| last_offered.contains("FA"));
    let spring_anchor = anchor_year.filter(|_| last_offered.contains("SP"));
    let both_terms = frequency.contains(FALL_AND_SPRING);

    let last_year = i64::from(current_year) + i64::from(prediction_years) + 1;
    let last_year = i32::try_from(last_year)
        .map_err(|_| RowPredictionError::YearOutOfRange { year: last_year })?;

    let mut terms = BTreeSet::new();
    for fall_year in current_year..last_year {
        let spring_year = fall_year + 1;

        if both_terms || offered_in_fall(frequency, fall_year, fall_anchor) {
            terms.insert(TermCode::fall(fall_year));
        }
        if both_terms || offered_in_spring(frequency, spring_year, spring_anchor) {
            terms.insert(TermCode::spring(spring_year));
        }
    }

    let current_suffix = current_year.rem_euclid(100);
    Ok(terms
        .into_iter()
        .filter(|term| term.suffix() >= current_suffix)
        .collect())
}

fn offered_in_fall(frequency: &str, year: i32, anchor: Option<i32>) -> bool {
    if frequency.contains(FALL_EVERY) {
        true
    } else if frequency.contains(FALL_EVEN) {
        year % 2 == 0
    } else if frequency.contains(FALL_ODD) {
        year % 2 != 0
    } else if frequency.contains(FALL_ALTERNATING) {
        anchor.is_some_and(|anchor| alternates_from(year, anchor))
    } else {
        false
    }
}

fn offered_in_spring(frequency: &str, year: i32, anchor: Option<i32>) -> bool {
    if frequency.contains(SPRING_EVERY) {
        true
    } else if SPRING_EVEN.iter().any(|label| frequency.contains(label)) {
        year % 2 == 0
    } else if frequency.contains(SPRING_ODD) {
        year % 2 != 0
    } else if frequency.contains(SPRING_ALTERNATING) {
        anchor.is_some_and(|anchor| alternates_from(year, anchor))
    } else {
        false
    }
}

fn alternates_from(year: i32, anchor: i32) -> bool {
    year >= anchor && (year - anchor) % 2 == 0
}

/// Year embedded in a free-text "Last Offered" value, e.g. `"FA22"` → 2022.
///
/// The last two numeric characters (or the only one) are read as a year in the
/// 2000s. `Ok(None)` when the text has no numeric characters.
pub fn extract_anchor_year(last_offered: &str) -> Result<Option<i32>, RowPredictionError> {
    let numerals: Vec<char> = last_offered.chars().filter(|c| c.is_numeric()).collect();
    let tail = &numerals[numerals.len().saturating_sub(2)..];
    if tail.is_empty() {
        return Ok(None);
    }

    let mut two_digit = 0;
    for &numeral in tail {
        let digit = numeral
            .to_digit(10)
            .ok_or_else(|| RowPredictionError::InvalidAnchorDigit {
                value: last_offered.to_string(),
                digit: numeral,
            })?;
        two_digit = two_digit * 10 + digit as i32;
    }

    Ok(Some(2000 + two_digit))
}
