pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, RunScope};
pub use config::TomlConfig;

pub use adapters::{ConfiguredSource, CsvDirectorySource, FixedClock, HttpCsvSource, LocalStorage, SystemClock};
pub use core::{
    duration::calculate_duration,
    etl::{EtlEngine, RunSummary, ScheduleRun},
    forecast::{extract_anchor_year, forecast_electives, predict_terms, ForecastSettings},
    header::locate_header,
    schedule::normalize_schedule,
};
pub use domain::model::{ElectiveRecord, Enrollment, RawTable, Row, ScheduleRecord, Table, TermCode};
pub use utils::error::{EtlError, Result, RowPredictionError};
