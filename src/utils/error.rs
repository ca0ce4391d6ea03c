use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Language model API error (status {status}): {message}")]
    LlmApiError { status: u16, message: String },

    #[error("Language model returned no content")]
    LlmEmptyResponse,

    #[error("Scrape failed for {url}: {message}")]
    ScrapeError { url: String, message: String },

    #[error("Chart rendering failed: {message}")]
    ChartError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("No job postings were collected")]
    NoJobsFound,

    #[error("No skills could be extracted from the collected postings")]
    NoSkillsFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    DataProcessing,
    FileSystem,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RadarError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RadarError::ConfigValidationError { .. }
            | RadarError::InvalidConfigValueError { .. }
            | RadarError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RadarError::HttpError(_)
            | RadarError::LlmApiError { .. }
            | RadarError::LlmEmptyResponse
            | RadarError::ScrapeError { .. }
            | RadarError::NoJobsFound => ErrorCategory::Network,
            RadarError::CsvError(_)
            | RadarError::SerializationError(_)
            | RadarError::ProcessingError { .. }
            | RadarError::NoSkillsFound => ErrorCategory::DataProcessing,
            RadarError::IoError(_) | RadarError::ZipError(_) => ErrorCategory::FileSystem,
            RadarError::ChartError { .. } => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RadarError::HttpError(_)
            | RadarError::ScrapeError { .. }
            | RadarError::NoJobsFound => ErrorSeverity::Medium,
            RadarError::LlmApiError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            RadarError::IoError(_) | RadarError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Medium)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RadarError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            RadarError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            RadarError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            RadarError::LlmApiError { status: 401, .. } => {
                "The language model API rejected the API key".to_string()
            }
            RadarError::LlmApiError { status, .. } => {
                format!("The language model API failed with status {}", status)
            }
            RadarError::NoJobsFound => {
                "No jobs found! The listings site may be blocking requests.".to_string()
            }
            RadarError::NoSkillsFound => "No skills to analyze".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => match self {
                RadarError::MissingConfigError { .. } => {
                    "Set it with: export GROQ_API_KEY=your_key_here"
                }
                _ => "Check the configuration file and command-line flags",
            },
            ErrorCategory::Network => match self {
                RadarError::NoJobsFound => "Try reducing --pages or raising the scrape delays",
                _ => "Check network connectivity and try again later",
            },
            ErrorCategory::DataProcessing => "Try again with more pages or different keywords",
            ErrorCategory::FileSystem => "Check that the output directory is writable",
            ErrorCategory::Rendering => "Check the ranked skills in the JSON output",
        }
    }
}

pub type Result<T> = std::result::Result<T, RadarError>;
