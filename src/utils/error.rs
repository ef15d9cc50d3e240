use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data source '{path}' could not be read: {message}")]
    DataSourceError { path: String, message: String },

    #[error("Override source '{path}' is invalid: {message}")]
    OverrideSourceError { path: String, message: String },

    #[error("Invalid record at row {row}, field '{field}': {reason}")]
    InvalidRecordError {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    DataSource,
    DataQuality,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl RankError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RankError::ConfigError { .. }
            | RankError::ConfigValidationError { .. }
            | RankError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RankError::DataSourceError { .. }
            | RankError::OverrideSourceError { .. }
            | RankError::CsvError(_) => ErrorCategory::DataSource,
            RankError::InvalidRecordError { .. } => ErrorCategory::DataQuality,
            RankError::IoError(_) | RankError::SerializationError(_) => ErrorCategory::Output,
            RankError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration
            | ErrorCategory::DataSource
            | ErrorCategory::DataQuality => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RankError::DataSourceError { path, .. } => format!(
                "Check that '{}' exists and is a CSV file with a header row",
                path
            ),
            RankError::OverrideSourceError { path, .. } => format!(
                "Fix or remove '{}'; it must be a JSON object like {{\"manual_priority\": [\"Product\"]}}",
                path
            ),
            RankError::InvalidRecordError { field, .. } => format!(
                "Correct the '{}' column in the catalog; counts must be non-negative integers and prices non-negative numbers",
                field
            ),
            RankError::CsvError(_) => "Check that the catalog is well-formed CSV".to_string(),
            RankError::ConfigError { .. } | RankError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and values".to_string()
            }
            RankError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            RankError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            RankError::SerializationError(_) | RankError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::DataSource => format!("Could not load input data: {}", self),
            ErrorCategory::DataQuality => format!("Catalog contains a bad record: {}", self),
            ErrorCategory::Output => format!("Could not write ranking output: {}", self),
            ErrorCategory::Internal => format!("Ranking failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
