use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Bulk request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot open input file '{path}': {source}")]
    InputOpenError {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot read header row of '{path}'")]
    MissingHeaderError { path: String },
}

/// Per-row failures. These never abort a run; the loader logs and counts them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("cannot parse {field} '{value}' as a timestamp: {source}")]
    TimeParseError {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("cannot parse {field} '{value}' as a coordinate: {reason}")]
    CoordinateParseError {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("row has {actual} columns, mapping requires {required}")]
    MalformedRowError { required: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigReadError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::InputOpenError { .. }
            | EtlError::MissingHeaderError { .. }
            | EtlError::CsvError(_)
            | EtlError::IoError(_) => ErrorCategory::Input,
            EtlError::ApiError(_) => ErrorCategory::Network,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ConfigReadError { path, .. } => {
                format!("Could not read the configuration file '{}'", path)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("The configuration is invalid ({}): {}", field, message)
            }
            EtlError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("The configuration value '{}' is invalid: {}", field, reason)
            }
            EtlError::InputOpenError { path, .. } => {
                format!("Could not open the input file '{}'", path)
            }
            EtlError::MissingHeaderError { path } => {
                format!("The input file '{}' has no readable header row", path)
            }
            EtlError::CsvError(e) => format!("The input file could not be read: {}", e),
            EtlError::IoError(e) => format!("A file operation failed: {}", e),
            EtlError::ApiError(e) => format!("The indexing endpoint could not be reached: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the config file path and that every field has the expected type"
            }
            ErrorCategory::Input => {
                "Check that input-address points to a readable delimited file with a header row"
            }
            ErrorCategory::Network => "Check that elk-address is reachable from this host",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
