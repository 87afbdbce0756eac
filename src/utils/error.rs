use thiserror::Error;

#[derive(Error, Debug)]
pub enum GearError {
    #[error("Invalid input for '{field}' (value: {value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GearError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        GearError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GearError::InvalidInput { .. } => ErrorCategory::Input,
            GearError::ConfigValidationError { .. } | GearError::MissingConfigError { .. } => {
                ErrorCategory::Configuration
            }
            GearError::IoError(_) | GearError::CsvError(_) | GearError::SerializationError(_) => {
                ErrorCategory::Io
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            GearError::InvalidInput { field, reason, .. } => {
                format!("Input '{}' is not usable: {}", field, reason)
            }
            GearError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            GearError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            GearError::IoError(e) => format!("Could not read or write a file: {}", e),
            GearError::CsvError(e) => format!("Could not render the gear table: {}", e),
            GearError::SerializationError(e) => format!("Could not encode the result: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GearError::InvalidInput { .. } => {
                "Check that mass, climb length, target power and wheel circumference are positive and that every search domain has at least one value"
            }
            GearError::ConfigValidationError { .. } => {
                "Fix the TOML syntax or the reported field and run again"
            }
            GearError::MissingConfigError { .. } => {
                "Add the missing section or key to the configuration file"
            }
            GearError::IoError(_) => "Make sure the path exists and is writable",
            GearError::CsvError(_) | GearError::SerializationError(_) => {
                "Try another output format"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GearError>;
