use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Verification(e) => {
                error!("Verification error details: {:?}", e);
            }
            CoreError::Backend(e) => {
                error!("Backend error details: {:?}", e);
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

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Verification(e) => e.is_retryable(),
            CoreError::Backend(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            CoreError::Timeout { .. } => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Verification(VerificationError::RateLimitExceeded { retry_after }) => {
                Some(Duration::from_secs(*retry_after))
            }
            CoreError::Backend(e) => e.retry_after(),
            CoreError::Timeout { seconds } => Some(Duration::from_secs(*seconds)),
            _ if self.is_retryable() => Some(Duration::from_secs(2)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Feed(e) => e.user_friendly_message(),
            CoreError::Verification(e) => e.user_friendly_message(),
            CoreError::Backend(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Timeout { .. } => {
                "The operation took too long to complete. Please try again.".to_string()
            }
            CoreError::Internal { .. } => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Feed(_) => "FEED".to_string(),
            CoreError::Verification(_) => "VERIFICATION".to_string(),
            CoreError::Backend(_) => "BACKEND".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Timeout { .. } => "TIMEOUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for FeedError {
    fn log_error(&self) -> &Self {
        error!("FeedError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("FeedError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false // The user has to change their input first
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            FeedError::EmptyContent => "Post content cannot be empty.".to_string(),
            FeedError::EmptyComment { .. } => "Comment cannot be empty.".to_string(),
            FeedError::EmptySolution { .. } => "Please write a solution first.".to_string(),
            FeedError::MissingField { field } => format!("Please fill in the {}.", field),
            FeedError::NotVerified { .. } => {
                "Please verify your solution before submitting it.".to_string()
            }
            FeedError::NotAProblem { .. } => "Only problems can be solved.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            FeedError::EmptyContent => "FEED_EMPTY_CONTENT".to_string(),
            FeedError::EmptyComment { .. } => "FEED_EMPTY_COMMENT".to_string(),
            FeedError::EmptySolution { .. } => "FEED_EMPTY_SOLUTION".to_string(),
            FeedError::MissingField { .. } => "FEED_MISSING_FIELD".to_string(),
            FeedError::NotVerified { .. } => "FEED_NOT_VERIFIED".to_string(),
            FeedError::NotAProblem { .. } => "FEED_NOT_A_PROBLEM".to_string(),
        }
    }
}

impl ErrorExt for VerificationError {
    fn log_error(&self) -> &Self {
        error!("VerificationError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("VerificationError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            VerificationError::RateLimitExceeded { .. } => true,
            VerificationError::RequestTimeout => true,
            VerificationError::ServerError { status_code } => *status_code >= 500,
            VerificationError::EndpointUnavailable { .. } => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            VerificationError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(10)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            VerificationError::InvalidApiKey => {
                "The solution judge rejected its API key. Please check your settings.".to_string()
            }
            VerificationError::RateLimitExceeded { retry_after } => format!(
                "Too many verification requests. Please wait {} seconds.",
                retry_after
            ),
            VerificationError::RequestTimeout => {
                "Verification timed out. Please try again.".to_string()
            }
            _ => "The solution judge is unavailable. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            VerificationError::EndpointUnavailable { .. } => {
                "VERIFY_ENDPOINT_UNAVAILABLE".to_string()
            }
            VerificationError::InvalidApiKey => "VERIFY_INVALID_API_KEY".to_string(),
            VerificationError::RateLimitExceeded { .. } => "VERIFY_RATE_LIMIT".to_string(),
            VerificationError::RequestTimeout => "VERIFY_TIMEOUT".to_string(),
            VerificationError::InvalidResponse { .. } => "VERIFY_INVALID_RESPONSE".to_string(),
            VerificationError::ServerError { .. } => "VERIFY_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for BackendError {
    fn log_error(&self) -> &Self {
        error!("BackendError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("BackendError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::DatabaseLocked | BackendError::ConnectionFailed { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            BackendError::DatabaseLocked => Some(Duration::from_millis(100)),
            _ if self.is_retryable() => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            BackendError::ConnectionFailed { .. } => {
                "Could not reach the server. Please try again.".to_string()
            }
            BackendError::DatabaseLocked => {
                "The server is temporarily busy. Please try again.".to_string()
            }
            BackendError::ProfileNotFound { .. } => {
                "Your profile could not be found. Please sign in again.".to_string()
            }
            _ => "Saving your progress failed. Please try again.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            BackendError::ConnectionFailed { .. } => "BACKEND_CONNECTION_FAILED".to_string(),
            BackendError::MigrationFailed { .. } => "BACKEND_MIGRATION_FAILED".to_string(),
            BackendError::DatabaseLocked => "BACKEND_LOCKED".to_string(),
            BackendError::ProfileNotFound { .. } => "BACKEND_PROFILE_NOT_FOUND".to_string(),
            BackendError::Sql(_) => "BACKEND_SQL_ERROR".to_string(),
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

    fn is_retryable(&self) -> bool {
        false // Config errors need the user to fix the file
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is invalid: {}", reason)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            ConfigError::Unreadable { path, .. } => {
                format!("Configuration file '{}' could not be read.", path)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Unreadable { .. } => "CONFIG_UNREADABLE".to_string(),
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

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
            if error.is_retryable() {
                if let Some(retry_after) = error.retry_after() {
                    info!("Error is retryable. Retry after: {:?}", retry_after);
                }
            }
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
