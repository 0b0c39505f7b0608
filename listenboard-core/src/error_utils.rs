use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Chat(e) => {
                error!("Chat error details: {:?}", e);
            }
            CoreError::Dataset(e) => {
                error!("Dataset error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Chat(e) => e.user_friendly_message(),
            CoreError::Dataset(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Timeout { .. } => {
                "The operation took too long to complete. Please try again.".to_string()
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Chat(_) => "CHAT".to_string(),
            CoreError::Dataset(_) => "DATASET".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Timeout { .. } => "TIMEOUT".to_string(),
        }
    }
}

impl ErrorExt for ChatError {
    fn log_error(&self) -> &Self {
        error!("ChatError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ChatError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ChatError::ServerError { status_code } if *status_code >= 500 => {
                "The AI service is temporarily unavailable. Please try again later.".to_string()
            }
            ChatError::RequestTimeout => {
                "The AI service took too long to answer. Please try again.".to_string()
            }
            ChatError::Busy => "Please wait for the current answer to arrive.".to_string(),
            _ => "AI service error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ChatError::ServerError { .. } => "CHAT_SERVER_ERROR".to_string(),
            ChatError::EndpointUnavailable { .. } => "CHAT_ENDPOINT_UNAVAILABLE".to_string(),
            ChatError::InvalidResponseFormat { .. } => "CHAT_INVALID_RESPONSE".to_string(),
            ChatError::RequestTimeout => "CHAT_TIMEOUT".to_string(),
            ChatError::Busy => "CHAT_BUSY".to_string(),
        }
    }
}

impl ErrorExt for DatasetError {
    fn log_error(&self) -> &Self {
        error!("DatasetError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("DatasetError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatasetError::ScoreOutOfRange { field, .. } => {
                format!("The dataset contains an invalid {} score.", field)
            }
            DatasetError::EmptyField { field, index } => {
                format!("Record {} in the dataset has no {}.", index + 1, field)
            }
            DatasetError::SeedNotFound { path } => {
                format!("Dataset file '{}' could not be found.", path)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            DatasetError::ScoreOutOfRange { .. } => "DATASET_SCORE_OUT_OF_RANGE".to_string(),
            DatasetError::EmptyField { .. } => "DATASET_EMPTY_FIELD".to_string(),
            DatasetError::SeedNotFound { .. } => "DATASET_SEED_NOT_FOUND".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => {
                "Configuration file not found. Please check the installation.".to_string()
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is not usable: {}.", reason)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
