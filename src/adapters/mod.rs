// Adapters layer: concrete implementations for external systems (sheet sources, storage, clock).

pub mod clock;
pub mod csv_source;
pub mod http_source;
pub mod storage;

use crate::config::toml_config::{SourceKind, TomlConfig};
use crate::core::{RawTable, SheetRef, TableSource};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;

pub use clock::{FixedClock, SystemClock};
pub use csv_source::CsvDirectorySource;
pub use http_source::HttpCsvSource;
pub use storage::LocalStorage;

/// Table source chosen by `[source] type`.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Csv(CsvDirectorySource),
    Http(HttpCsvSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let source = &config.source;
        match config.source_kind()? {
            SourceKind::Csv => {
                let base_path = validate_required_field("source.base_path", &source.base_path)?;
                Ok(Self::Csv(CsvDirectorySource::new(base_path)))
            }
            SourceKind::Http => {
                let endpoint = validate_required_field("source.endpoint", &source.endpoint)?;
                Ok(Self::Http(HttpCsvSource::new(
                    endpoint.clone(),
                    source.timeout_seconds,
                )?))
            }
        }
    }
}

impl TableSource for ConfiguredSource {
    async fn fetch_table(&self, sheet: &SheetRef) -> Result<RawTable> {
        match self {
            Self::Csv(source) => source.fetch_table(sheet).await,
            Self::Http(source) => source.fetch_table(sheet).await,
        }
    }
}
