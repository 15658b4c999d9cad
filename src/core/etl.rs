use crate::config::toml_config::TomlConfig;
use crate::core::pipeline::{to_pretty_json, ElectivePipeline, SchedulePipeline};
use crate::core::{Pipeline, SemesterManifestEntry, Storage, TableSource};
use crate::utils::error::{EtlError, Result};
use std::sync::Arc;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        tracing::info!("--- Processing: {} ---", name);

        let raw_table = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} raw rows from '{}'", raw_table.rows.len(), raw_table.sheet);

        let records = self.pipeline.transform(raw_table).await?;
        let count = records.len();

        let output_path = self.pipeline.load(records).await?;
        tracing::info!("Saved {} records for {} to '{}'", count, name, output_path);

        Ok(output_path)
    }
}

/// Outcome of the schedule pass over all configured semesters.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: Vec<SemesterManifestEntry>,
    pub failed: Vec<(String, EtlError)>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives every configured sheet, one at a time.
pub struct ScheduleRun<T: TableSource, S: Storage> {
    config: TomlConfig,
    source: Arc<T>,
    storage: Arc<S>,
    current_year: i32,
}

impl<T: TableSource, S: Storage> ScheduleRun<T, S> {
    pub fn new(config: TomlConfig, source: T, storage: S, current_year: i32) -> Self {
        Self {
            config,
            source: Arc::new(source),
            storage: Arc::new(storage),
            current_year,
        }
    }

    /// Processes each semester in turn. A semester that fails is logged and
    /// skipped; the manifest lists the ones that were written.
    pub async fn run_semesters(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for semester in &self.config.semesters {
            let pipeline = SchedulePipeline::new(
                semester.clone(),
                self.config.schedule.marker.clone(),
                Arc::clone(&self.source),
                Arc::clone(&self.storage),
            );

            match EtlEngine::new(pipeline).run().await {
                Ok(data_file) => summary.completed.push(SemesterManifestEntry {
                    display_title: semester.display_title.clone(),
                    data_file,
                }),
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", semester.display_title, e);
                    summary.failed.push((semester.display_title.clone(), e));
                }
            }
        }

        if !self.config.semesters.is_empty() {
            let manifest = to_pretty_json(&summary.completed)?;
            self.storage
                .write_file(self.config.manifest_file(), &manifest)
                .await?;
            tracing::info!(
                "Semester manifest with {} entries saved to '{}'",
                summary.completed.len(),
                self.config.manifest_file()
            );
        }

        Ok(summary)
    }

    /// Runs the elective forecast. Any failure aborts the pass as
    /// [`EtlError::BatchFatal`]. `Ok(None)` when no elective sheet is configured.
    pub async fn run_electives(&self) -> Result<Option<String>> {
        let Some(electives) = &self.config.electives else {
            tracing::debug!("No [electives] section configured");
            return Ok(None);
        };

        let pipeline = ElectivePipeline::new(
            electives.clone(),
            self.current_year,
            Arc::clone(&self.source),
            Arc::clone(&self.storage),
        );

        EtlEngine::new(pipeline)
            .run()
            .await
            .map(Some)
            .map_err(|e| EtlError::batch_fatal(electives.worksheet.clone(), e))
    }

    pub async fn run_all(&self) -> Result<RunSummary> {
        let summary = self.run_semesters().await?;
        self.run_electives().await?;
        Ok(summary)
    }
}
