use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("{service} call timed out after {elapsed_ms}ms")]
    TimeoutError { service: String, elapsed_ms: u64 },

    #[error("Circuit breaker for {service} is open")]
    CircuitOpenError { service: String },

    #[error("{service} returned status {status}")]
    UpstreamStatusError { service: String, status: u16 },

    #[error("Invalid score from scoring service: '{raw}'")]
    InvalidScoreError { raw: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ModerationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_)
            | Self::TimeoutError { .. }
            | Self::CircuitOpenError { .. }
            | Self::UpstreamStatusError { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::InvalidScoreError { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Data,
            Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CircuitOpenError { .. } => ErrorSeverity::Low,
            Self::HttpError(_)
            | Self::TimeoutError { .. }
            | Self::UpstreamStatusError { .. } => ErrorSeverity::Medium,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::InvalidScoreError { .. }
            | Self::ProcessingError { .. }
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::TimeoutError { .. } => true,
            Self::UpstreamStatusError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("External service problem: {}", self),
            ErrorCategory::Data => format!("Input data problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::TimeoutError { .. } | Self::UpstreamStatusError { .. } => {
                "Check that the translation/scoring services are reachable and responsive"
            }
            Self::CircuitOpenError { .. } => {
                "The upstream service is failing; wait for the circuit breaker to close"
            }
            Self::CsvError(_) | Self::ProcessingError { .. } => {
                "Verify the input CSV has a 'user_id,message' header and well-formed rows"
            }
            Self::InvalidScoreError { .. } => {
                "The scoring service must return a plain-text floating point number"
            }
            Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ValidationError { .. } => {
                "Review the configuration file and command-line arguments"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Check that request/response payloads are valid JSON",
        }
    }
}

pub type Result<T> = std::result::Result<T, ModerationError>;
