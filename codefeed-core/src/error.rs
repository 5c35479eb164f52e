use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Operation timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Validation failures raised by feed interactions. None of these mutate state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Post content is empty")]
    EmptyContent,

    #[error("Comment draft for post {post_id} is empty")]
    EmptyComment { post_id: String },

    #[error("Solution for post {post_id} is empty")]
    EmptySolution { post_id: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Solution for post {post_id} has not passed verification")]
    NotVerified { post_id: String },

    #[error("Post {post_id} is not a problem")]
    NotAProblem { post_id: String },
}

#[derive(Error, Debug, Clone)]
pub enum VerificationError {
    #[error("Judge endpoint unavailable: {endpoint}")]
    EndpointUnavailable { endpoint: String },

    #[error("API key invalid or missing for judge")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid judge response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Migration failed: {migration}")]
    MigrationFailed { migration: String },

    #[error("Database locked")]
    DatabaseLocked,

    #[error("Profile not found: {user_id}")]
    ProfileNotFound { user_id: String },

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },

    #[error("Could not read config {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
