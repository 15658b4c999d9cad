use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Sheet '{sheet}' has no rows")]
    EmptyTable { sheet: String },

    #[error("Could not find header row containing '{marker}' in sheet '{sheet}'")]
    HeaderNotFound { marker: String, sheet: String },

    #[error("Pipeline '{pipeline}' aborted: {source}")]
    BatchFatal {
        pipeline: String,
        #[source]
        source: Box<EtlError>,
    },

    #[error("Table source error: {message}")]
    Source { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

/// Failure while predicting terms for a single elective row.
/// Never escalates past the batch; the row gets an empty prediction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowPredictionError {
    #[error("'Last Offered' value '{value}' contains non-decimal digit '{digit}'")]
    InvalidAnchorDigit { value: String, digit: char },

    #[error("candidate year {year} is out of range")]
    YearOutOfRange { year: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Source,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn batch_fatal(pipeline: impl Into<String>, source: EtlError) -> Self {
        EtlError::BatchFatal {
            pipeline: pipeline.into(),
            source: Box::new(source),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::EmptyTable { .. } | EtlError::HeaderNotFound { .. } => ErrorCategory::Data,
            EtlError::BatchFatal { source, .. } => source.category(),
            EtlError::Source { .. } | EtlError::HttpError(_) | EtlError::CsvError(_) => {
                ErrorCategory::Source
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::EmptyTable { .. } | EtlError::HeaderNotFound { .. } => ErrorSeverity::Medium,
            EtlError::BatchFatal { .. } => ErrorSeverity::Critical,
            EtlError::Source { .. } | EtlError::HttpError(_) | EtlError::CsvError(_) => {
                ErrorSeverity::Medium
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::EmptyTable { sheet } => format!("Worksheet '{}' is empty", sheet),
            EtlError::HeaderNotFound { marker, sheet } => format!(
                "Worksheet '{}' has no header row with a '{}' column",
                sheet, marker
            ),
            EtlError::BatchFatal { pipeline, source } => format!(
                "Processing '{}' stopped: {}",
                pipeline,
                source.user_friendly_message()
            ),
            EtlError::Source { message } => format!("Could not read the sheet: {}", message),
            EtlError::HttpError(_) => "Could not download the sheet export".to_string(),
            EtlError::CsvError(_) => "The sheet export is not valid CSV".to_string(),
            EtlError::IoError(e) => format!("File system error: {}", e),
            EtlError::SerializationError(_) => "Could not write JSON output".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Data => {
                "Check that the worksheet exists and its header row has the expected column names"
            }
            ErrorCategory::Source => "Check the source settings and that the sheet export is reachable",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::System => "Check permissions and free space for the output path",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
