use codefeed_core::{
    BackendError, ConfigError, CoreError, ErrorExt, ErrorReporter, FeedError, VerificationError,
};
use std::time::Duration;

#[test]
fn test_error_codes() {
    let feed_error = CoreError::Feed(FeedError::EmptyContent);
    assert_eq!(feed_error.error_code(), "FEED");

    let verify_error = CoreError::Verification(VerificationError::InvalidApiKey);
    assert_eq!(verify_error.error_code(), "VERIFICATION");

    let backend_error = CoreError::Backend(BackendError::DatabaseLocked);
    assert_eq!(backend_error.error_code(), "BACKEND");

    let config_error = CoreError::Config(ConfigError::ValidationFailed {
        reason: "page size".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    assert_eq!(
        FeedError::NotVerified {
            post_id: "p1".to_string()
        }
        .error_code(),
        "FEED_NOT_VERIFIED"
    );
}

#[test]
fn test_retryable_errors() {
    let retryable_error =
        CoreError::Verification(VerificationError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable_error.is_retryable());

    let locked = CoreError::Backend(BackendError::DatabaseLocked);
    assert!(locked.is_retryable());

    let validation_error = CoreError::Feed(FeedError::EmptyComment {
        post_id: "p1".to_string(),
    });
    assert!(!validation_error.is_retryable());
    assert_eq!(validation_error.retry_after(), None);
}

#[test]
fn test_retry_after() {
    let rate_limit_error =
        CoreError::Verification(VerificationError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(
        rate_limit_error.retry_after(),
        Some(Duration::from_secs(60))
    );

    let locked = CoreError::Backend(BackendError::DatabaseLocked);
    assert_eq!(locked.retry_after(), Some(Duration::from_millis(100)));

    let timeout_error = CoreError::Timeout { seconds: 30 };
    assert_eq!(timeout_error.retry_after(), Some(Duration::from_secs(30)));
}

#[test]
fn test_user_friendly_messages() {
    let empty_comment = CoreError::Feed(FeedError::EmptyComment {
        post_id: "p1".to_string(),
    });
    assert_eq!(
        empty_comment.user_friendly_message(),
        "Comment cannot be empty."
    );

    let not_verified = CoreError::Feed(FeedError::NotVerified {
        post_id: "p1".to_string(),
    });
    assert!(not_verified.user_friendly_message().contains("verify"));

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "feed.page_size".to_string(),
        value: "0".to_string(),
    });
    assert!(config_error.user_friendly_message().contains("feed.page_size"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new();
    let error = CoreError::Backend(BackendError::DatabaseLocked);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
