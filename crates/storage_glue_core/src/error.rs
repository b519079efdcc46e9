use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failed storage or notification call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    Transient,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AccessDenied => "access_denied",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call against an external service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({kind}): {message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub operation: &'static str,
    pub message: String,
    pub code: Option<String>,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Maps a service error code (S3 or SNS) to a kind.
pub fn classify_error_code(code: &str) -> ErrorKind {
    match code {
        "NoSuchKey" | "NoSuchBucket" | "NotFound" | "NotFoundException" | "ResourceNotFound" => {
            ErrorKind::NotFound
        }
        "AccessDenied" | "AccessDeniedException" | "AuthorizationError" | "Forbidden"
        | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
        | "InvalidClientTokenId" => ErrorKind::AccessDenied,
        "SlowDown" | "Throttling" | "ThrottlingException" | "ThrottledException"
        | "RequestTimeout" | "InternalError" | "InternalErrorException"
        | "ServiceUnavailable" | "KMSThrottlingException" => ErrorKind::Transient,
        _ => ErrorKind::Unknown,
    }
}

/// Fallback for responses that carry no error code, e.g. a HEAD 404.
pub fn classify_http_status(status: u16) -> ErrorKind {
    match status {
        404 => ErrorKind::NotFound,
        401 | 403 => ErrorKind::AccessDenied,
        408 | 429 | 500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Unknown,
    }
}

/// Flattens an error and its sources into one line per cause.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_codes() {
        assert_eq!(classify_error_code("NoSuchKey"), ErrorKind::NotFound);
        assert_eq!(classify_error_code("NoSuchBucket"), ErrorKind::NotFound);
        assert_eq!(classify_error_code("AccessDenied"), ErrorKind::AccessDenied);
        assert_eq!(
            classify_error_code("AuthorizationError"),
            ErrorKind::AccessDenied
        );
        assert_eq!(classify_error_code("SlowDown"), ErrorKind::Transient);
        assert_eq!(classify_error_code("Throttled"), ErrorKind::Unknown);
        assert_eq!(
            classify_error_code("BucketAlreadyExists"),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn classifies_status_codes() {
        assert_eq!(classify_http_status(404), ErrorKind::NotFound);
        assert_eq!(classify_http_status(403), ErrorKind::AccessDenied);
        assert_eq!(classify_http_status(503), ErrorKind::Transient);
        assert_eq!(classify_http_status(429), ErrorKind::Transient);
        assert_eq!(classify_http_status(400), ErrorKind::Unknown);
    }

    #[test]
    fn service_error_display_names_operation_and_kind() {
        let error = ServiceError::new(ErrorKind::NotFound, "head_object", "no such key")
            .with_code("NotFound");
        assert_eq!(
            error.to_string(),
            "head_object failed (not_found): no such key"
        );
        assert!(error.is_not_found());
        assert_eq!(error.code.as_deref(), Some("NotFound"));
    }

    #[test]
    fn error_chain_walks_sources() {
        #[derive(Debug, Error)]
        #[error("publish step failed")]
        struct Outer {
            #[source]
            inner: ServiceError,
        }

        let error = Outer {
            inner: ServiceError::new(ErrorKind::Transient, "publish", "timed out"),
        };
        let chain = error_chain(&error);
        assert_eq!(
            chain,
            vec![
                "publish step failed".to_string(),
                "publish failed (transient): timed out".to_string(),
            ]
        );
    }
}
