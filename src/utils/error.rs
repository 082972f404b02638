use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Date/time parsing error: {0}")]
    DateTimeError(#[from] chrono::ParseError),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Configuration,
    Validation,
    Auth,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status the CLI reports for a failure of this severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DeskError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DeskError::HttpError(_) => ErrorCategory::Network,
            DeskError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            DeskError::ApiError { .. } | DeskError::NotFound { .. } => ErrorCategory::Api,
            DeskError::CsvError(_)
            | DeskError::SerializationError(_)
            | DeskError::DateTimeError(_) => ErrorCategory::Data,
            DeskError::ConfigError { .. }
            | DeskError::ConfigValidationError { .. }
            | DeskError::InvalidConfigValueError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::UrlError(_) => ErrorCategory::Configuration,
            DeskError::ValidationError { .. } => ErrorCategory::Validation,
            DeskError::NotAuthenticated | DeskError::PermissionDenied(_) => ErrorCategory::Auth,
            DeskError::ZipError(_) | DeskError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DeskError::HttpError(_) => ErrorSeverity::Medium,
            DeskError::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            DeskError::ApiError { .. } | DeskError::NotFound { .. } => ErrorSeverity::High,
            DeskError::ValidationError { .. } => ErrorSeverity::High,
            DeskError::NotAuthenticated | DeskError::PermissionDenied(_) => ErrorSeverity::High,
            DeskError::CsvError(_)
            | DeskError::SerializationError(_)
            | DeskError::DateTimeError(_) => ErrorSeverity::High,
            DeskError::ConfigError { .. }
            | DeskError::ConfigValidationError { .. }
            | DeskError::InvalidConfigValueError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::UrlError(_) => ErrorSeverity::Critical,
            DeskError::ZipError(_) | DeskError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeskError::HttpError(_) => {
                "Check the network connection and that the API server is reachable".to_string()
            }
            DeskError::ApiError { status: 401, .. } | DeskError::NotAuthenticated => {
                "Run `booking-desk login` to start a new session".to_string()
            }
            DeskError::ApiError { status: 403, .. } | DeskError::PermissionDenied(_) => {
                "Sign in with an account that has the required role".to_string()
            }
            DeskError::ApiError { status, .. } if *status >= 500 => {
                "The server failed to handle the request, try again later".to_string()
            }
            DeskError::ApiError { .. } => "Review the request arguments and retry".to_string(),
            DeskError::NotFound { entity, .. } => {
                format!("Make sure the {} id is correct", entity.to_lowercase())
            }
            DeskError::ValidationError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            DeskError::ConfigError { .. }
            | DeskError::ConfigValidationError { .. }
            | DeskError::InvalidConfigValueError { .. }
            | DeskError::MissingConfigError { .. }
            | DeskError::UrlError(_) => {
                "Check the profile file and command line flags".to_string()
            }
            DeskError::CsvError(_)
            | DeskError::SerializationError(_)
            | DeskError::DateTimeError(_) => {
                "The server returned data in an unexpected format".to_string()
            }
            DeskError::ZipError(_) | DeskError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeskError::ApiError { message, .. } => message.clone(),
            DeskError::ValidationError { message, .. } => message.clone(),
            DeskError::NotAuthenticated => "You are not signed in".to_string(),
            DeskError::PermissionDenied(what) => format!("Not allowed: {}", what),
            DeskError::HttpError(_) => "Could not reach the booking API".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
