use crate::config::toml_config::{ElectivesConfig, SemesterConfig};
use crate::core::forecast::{forecast_electives, ForecastSettings};
use crate::core::header::locate_header;
use crate::core::schedule::{normalize_schedule, COURSE_COLUMN};
use crate::core::{ElectiveRecord, Pipeline, RawTable, Result, ScheduleRecord, Storage, TableSource};
use crate::utils::error::EtlError;
use serde::Serialize;
use std::sync::Arc;

/// Pretty JSON with four-space indentation, the layout the site's data files use.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// One semester worksheet → `ScheduleRecord` JSON.
pub struct SchedulePipeline<T: TableSource, S: Storage> {
    semester: SemesterConfig,
    marker: String,
    source: Arc<T>,
    storage: Arc<S>,
}

impl<T: TableSource, S: Storage> SchedulePipeline<T, S> {
    pub fn new(semester: SemesterConfig, marker: String, source: Arc<T>, storage: Arc<S>) -> Self {
        Self {
            semester,
            marker,
            source,
            storage,
        }
    }
}

#[async_trait::async_trait]
impl<T: TableSource, S: Storage> Pipeline for SchedulePipeline<T, S> {
    type Output = ScheduleRecord;

    fn name(&self) -> &str {
        &self.semester.display_title
    }

    async fn extract(&self) -> Result<RawTable> {
        tracing::info!(
            "Reading data from '{}' (worksheet '{}')",
            self.semester.spreadsheet,
            self.semester.worksheet
        );
        self.source.fetch_table(&self.semester.sheet_ref()).await
    }

    async fn transform(&self, table: RawTable) -> Result<Vec<ScheduleRecord>> {
        let table = locate_header(&table, &self.marker)?;

        // Only reachable with a custom marker.
        if !table.has_column(COURSE_COLUMN) {
            return Err(EtlError::HeaderNotFound {
                marker: COURSE_COLUMN.to_string(),
                sheet: table.sheet,
            });
        }

        Ok(normalize_schedule(&table))
    }

    async fn load(&self, records: Vec<ScheduleRecord>) -> Result<String> {
        let data = to_pretty_json(&records)?;
        self.storage
            .write_file(&self.semester.output_json_file, &data)
            .await?;
        Ok(self.semester.output_json_file.clone())
    }
}

/// The elective worksheet → `ElectiveRecord` JSON with forecasts.
pub struct ElectivePipeline<T: TableSource, S: Storage> {
    electives: ElectivesConfig,
    settings: ForecastSettings,
    current_year: i32,
    source: Arc<T>,
    storage: Arc<S>,
}

impl<T: TableSource, S: Storage> ElectivePipeline<T, S> {
    pub fn new(electives: ElectivesConfig, current_year: i32, source: Arc<T>, storage: Arc<S>) -> Self {
        let settings = electives.forecast_settings();
        Self {
            electives,
            settings,
            current_year,
            source,
            storage,
        }
    }
}

#[async_trait::async_trait]
impl<T: TableSource, S: Storage> Pipeline for ElectivePipeline<T, S> {
    type Output = ElectiveRecord;

    fn name(&self) -> &str {
        &self.electives.worksheet
    }

    async fn extract(&self) -> Result<RawTable> {
        tracing::info!(
            "Reading electives from '{}' (worksheet '{}')",
            self.electives.spreadsheet,
            self.electives.worksheet
        );
        self.source.fetch_table(&self.electives.sheet_ref()).await
    }

    async fn transform(&self, table: RawTable) -> Result<Vec<ElectiveRecord>> {
        let table = locate_header(&table, &self.electives.marker)?;
        tracing::info!(
            "Forecasting {} electives from {} through {}",
            table.rows.len(),
            self.current_year,
            self.current_year
                .saturating_add_unsigned(self.settings.prediction_years)
        );
        Ok(forecast_electives(&table, &self.settings, self.current_year))
    }

    async fn load(&self, records: Vec<ElectiveRecord>) -> Result<String> {
        let data = to_pretty_json(&records)?;
        self.storage
            .write_file(&self.electives.output_json_file, &data)
            .await?;
        Ok(self.electives.output_json_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SheetRef;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MockSource {
        tables: HashMap<String, Vec<Vec<String>>>,
    }

    impl MockSource {
        fn with(worksheet: &str, rows: &[&[&str]]) -> Self {
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect();
            Self {
                tables: HashMap::from([(worksheet.to_string(), rows)]),
            }
        }
    }

    impl TableSource for MockSource {
        async fn fetch_table(&self, sheet: &SheetRef) -> Result<RawTable> {
            self.tables
                .get(&sheet.worksheet)
                .map(|rows| RawTable::new(sheet.worksheet.clone(), rows.clone()))
                .ok_or_else(|| EtlError::Source {
                    message: format!("no worksheet {}", sheet.worksheet),
                })
        }
    }

    #[derive(Default)]
    struct MockStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn semester() -> SemesterConfig {
        SemesterConfig {
            display_title: "Fall 2026".to_string(),
            spreadsheet: "CHEN Schedule".to_string(),
            worksheet: "Fall 2026".to_string(),
            output_json_file: "data/fall2026.json".to_string(),
        }
    }

    #[tokio::test]
    async fn test_schedule_pipeline_round_trip() {
        let source = Arc::new(MockSource::with(
            "Fall 2026",
            &[&["X", "COURSE", "TIME"], &["1", "CS101", "9:00AM-10:15AM"], &["2", "CS102", "TBA"]],
        ));
        let storage = Arc::new(MockStorage::default());
        let pipeline = SchedulePipeline::new(semester(), "COURSE".to_string(), source, storage.clone());

        let raw = pipeline.extract().await.unwrap();
        let records = pipeline.transform(raw).await.unwrap();
        let path = pipeline.load(records).await.unwrap();

        assert_eq!(path, "data/fall2026.json");
        let written = storage.read_file("data/fall2026.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json[0]["duration"], 75);
        assert_eq!(json[1]["time_of_day"], "Online/Asynchronous");
        assert!(String::from_utf8(written).unwrap().contains("\n    {\n        \"course_number\""));
    }

    #[tokio::test]
    async fn test_schedule_pipeline_custom_marker_without_course_column() {
        let source = Arc::new(MockSource::with("Fall 2026", &[&["Class", "TIME"], &["CS101", "TBA"]]));
        let storage = Arc::new(MockStorage::default());
        let pipeline = SchedulePipeline::new(semester(), "Class".to_string(), source, storage);

        let raw = pipeline.extract().await.unwrap();
        let err = pipeline.transform(raw).await.unwrap_err();
        assert!(matches!(err, EtlError::HeaderNotFound { marker, .. } if marker == "COURSE"));
    }

    #[tokio::test]
    async fn test_elective_pipeline_writes_forecast() {
        let source = Arc::new(MockSource::with(
            "Electives",
            &[
                &["Course Title", "Offering Frequency", "Last Offered"],
                &["Polymers", "Spring - Odd Years", "SP25"],
            ],
        ));
        let storage = Arc::new(MockStorage::default());
        let electives = ElectivesConfig {
            spreadsheet: "CHEN Electives".to_string(),
            worksheet: "Electives".to_string(),
            output_json_file: "electives.json".to_string(),
            marker: "Offering Frequency".to_string(),
            prediction_years: 5,
            frequency_column: None,
            last_offered_column: None,
        };
        let pipeline = ElectivePipeline::new(electives, 2026, source, storage.clone());

        let raw = pipeline.extract().await.unwrap();
        let records = pipeline.transform(raw).await.unwrap();
        pipeline.load(records).await.unwrap();

        let written = storage.read_file("electives.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json[0]["Course Title"], "Polymers");
        assert_eq!(json[0]["predicted_schedule"], serde_json::json!(["SP27", "SP29", "SP31"]));
        assert_eq!(json[0]["Next Offering"], "SP27");
    }

    #[tokio::test]
    async fn test_elective_pipeline_year_at_limit_falls_back_to_on_demand() {
        let source = Arc::new(MockSource::with(
            "Electives",
            &[
                &["Course Title", "Offering Frequency", "Last Offered"],
                &["Transport", "Fall - Every", ""],
            ],
        ));
        let storage = Arc::new(MockStorage::default());
        let electives = ElectivesConfig {
            spreadsheet: "CHEN Electives".to_string(),
            worksheet: "Electives".to_string(),
            output_json_file: "electives.json".to_string(),
            marker: "Offering Frequency".to_string(),
            prediction_years: 5,
            frequency_column: None,
            last_offered_column: None,
        };
        let pipeline = ElectivePipeline::new(electives, i32::MAX, source, storage);

        let raw = pipeline.extract().await.unwrap();
        let records = pipeline.transform(raw).await.unwrap();

        assert!(records[0].predicted_schedule.is_empty());
        assert_eq!(records[0].next_offering, "On Demand");
    }
}
