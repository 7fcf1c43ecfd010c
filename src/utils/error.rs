use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status code: {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Failed to decode directory response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid {kind} name passed: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Failed to resolve location: {0}")]
    LocationResolution(#[source] Box<SlotError>),

    #[error("Failed to fetch appointment sessions: {today}; {week_ahead}")]
    AllStreamsFailed {
        today: Box<SlotError>,
        week_ahead: Box<SlotError>,
    },

    #[error("Notification via {channel} failed: {message}")]
    DeliveryError { channel: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SlotError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SlotError::DeliveryError { .. } => ErrorSeverity::Low,
            SlotError::ApiError(_)
            | SlotError::UnexpectedStatus { .. }
            | SlotError::AllStreamsFailed { .. } => ErrorSeverity::Medium,
            SlotError::DecodeError(_) | SlotError::IoError(_) => ErrorSeverity::High,
            SlotError::LocationResolution(inner) => match inner.as_ref() {
                SlotError::NotFound { .. } => ErrorSeverity::Critical,
                other => other.severity(),
            },
            SlotError::NotFound { .. }
            | SlotError::ConfigError { .. }
            | SlotError::InvalidConfigValueError { .. }
            | SlotError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 下一輪排程是否值得重試
    pub fn is_transient(&self) -> bool {
        matches!(
            self.severity(),
            ErrorSeverity::Low | ErrorSeverity::Medium
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SlotError::NotFound { kind, name } => {
                format!("Could not find a {} named '{}' in the directory", kind, name)
            }
            SlotError::LocationResolution(inner) => inner.user_friendly_message(),
            SlotError::AllStreamsFailed { .. } | SlotError::ApiError(_) => {
                "The appointment directory could not be reached".to_string()
            }
            SlotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            SlotError::MissingConfigError { field } => {
                format!("Missing required configuration: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.severity() {
            ErrorSeverity::Low => "The next cycle will notify again if the slots change",
            ErrorSeverity::Medium => "The directory will be queried again on the next cycle",
            ErrorSeverity::High => "Check whether the directory API has changed its format",
            ErrorSeverity::Critical => "Fix the configuration and restart",
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
