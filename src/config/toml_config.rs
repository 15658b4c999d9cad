use crate::core::forecast::{
    ForecastSettings, DEFAULT_PREDICTION_YEARS, FREQUENCY_COLUMN, LAST_OFFERED_COLUMN,
};
use crate::core::schedule::COURSE_COLUMN;
use crate::core::SheetRef;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_endpoint_template, validate_non_empty_string, validate_path, validate_range,
    validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MANIFEST_FILE: &str = "data/semesters.json";
const MAX_PREDICTION_YEARS: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub semesters: Vec<SemesterConfig>,
    pub electives: Option<ElectivesConfig>,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    /// Root directory of `{spreadsheet}/{worksheet}.csv` exports.
    pub base_path: Option<String>,
    /// Export URL with `{spreadsheet}` and `{worksheet}` placeholders.
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_marker")]
    pub marker: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            marker: default_schedule_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterConfig {
    pub display_title: String,
    pub spreadsheet: String,
    pub worksheet: String,
    pub output_json_file: String,
}

impl SemesterConfig {
    pub fn sheet_ref(&self) -> SheetRef {
        SheetRef {
            spreadsheet: self.spreadsheet.clone(),
            worksheet: self.worksheet.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectivesConfig {
    pub spreadsheet: String,
    pub worksheet: String,
    pub output_json_file: String,
    #[serde(default = "default_elective_marker")]
    pub marker: String,
    #[serde(default = "default_prediction_years")]
    pub prediction_years: u32,
    pub frequency_column: Option<String>,
    pub last_offered_column: Option<String>,
}

impl ElectivesConfig {
    pub fn sheet_ref(&self) -> SheetRef {
        SheetRef {
            spreadsheet: self.spreadsheet.clone(),
            worksheet: self.worksheet.clone(),
        }
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            prediction_years: self.prediction_years,
            frequency_column: self
                .frequency_column
                .clone()
                .unwrap_or_else(|| FREQUENCY_COLUMN.to_string()),
            last_offered_column: self
                .last_offered_column
                .clone()
                .unwrap_or_else(|| LAST_OFFERED_COLUMN.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub manifest_file: Option<String>,
}

fn default_schedule_marker() -> String {
    COURSE_COLUMN.to_string()
}

fn default_elective_marker() -> String {
    FREQUENCY_COLUMN.to_string()
}

fn default_prediction_years() -> u32 {
    DEFAULT_PREDICTION_YEARS
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEET_EXPORT_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn source_kind(&self) -> Result<SourceKind> {
        match self.source.r#type.as_str() {
            "csv" => Ok(SourceKind::Csv),
            "http" => Ok(SourceKind::Http),
            other => Err(EtlError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Unsupported source type. Valid types: csv, http".to_string(),
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.source_kind()? {
            SourceKind::Csv => {
                let base_path = validate_required_field("source.base_path", &self.source.base_path)?;
                validate_path("source.base_path", base_path)?;
            }
            SourceKind::Http => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_endpoint_template("source.endpoint", endpoint)?;
            }
        }

        validate_non_empty_string("schedule.marker", &self.schedule.marker)?;

        for (i, semester) in self.semesters.iter().enumerate() {
            validate_non_empty_string(&format!("semesters[{}].worksheet", i), &semester.worksheet)?;
            validate_path(
                &format!("semesters[{}].output_json_file", i),
                &semester.output_json_file,
            )?;
        }

        if let Some(electives) = &self.electives {
            validate_non_empty_string("electives.marker", &electives.marker)?;
            validate_non_empty_string("electives.worksheet", &electives.worksheet)?;
            validate_path("electives.output_json_file", &electives.output_json_file)?;
            validate_range(
                "electives.prediction_years",
                electives.prediction_years,
                1,
                MAX_PREDICTION_YEARS,
            )?;
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_path("load.manifest_file", self.manifest_file())?;

        if self.semesters.is_empty() && self.electives.is_none() {
            return Err(EtlError::ConfigError {
                message: "Nothing to process: configure [[semesters]] or [electives]".to_string(),
            });
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn manifest_file(&self) -> &str {
        self.load
            .manifest_file
            .as_deref()
            .unwrap_or(DEFAULT_MANIFEST_FILE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
