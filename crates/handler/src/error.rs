use http::StatusCode;
use model::{Error, RecordError};
use std::fmt::{Display, Formatter};
use store::StoreError;

/// Outcome of processing a request that did not succeed.
///
/// Only the status code and a generic message reach the caller, the rest is logged.
#[derive(Debug)]
pub enum HandlerError {
    // The body was not valid JSON
    InvalidJson(serde_json::Error),
    // A required key was absent from the payload
    MissingField(String),
    // Any other failure, tagged with a short type name for the logs
    Internal {
        error_type: &'static str,
        source: Error,
    },
}

impl HandlerError {
    pub fn internal(error_type: &'static str, source: impl Into<Error>) -> Self {
        HandlerError::Internal {
            error_type,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::InvalidJson(_) | HandlerError::MissingField(_) => StatusCode::BAD_REQUEST,
            HandlerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned in the response body.
    pub fn client_message(&self) -> &'static str {
        match self {
            HandlerError::InvalidJson(_) => "Invalid JSON format",
            HandlerError::MissingField(_) => "Missing required field",
            HandlerError::Internal { .. } => "Internal server error",
        }
    }

    /// Message of the error log event.
    pub fn log_message(&self) -> &'static str {
        match self {
            HandlerError::InvalidJson(_) => "Invalid JSON in request body",
            HandlerError::MissingField(_) => "Missing required field in payload",
            HandlerError::Internal { .. } => "Failed to process request",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            HandlerError::InvalidJson(_) => "InvalidJson",
            HandlerError::MissingField(_) => "MissingField",
            HandlerError::Internal { error_type, .. } => *error_type,
        }
    }

    /// Failures operators need to correlate with a distributed trace.
    pub fn is_internal(&self) -> bool {
        matches!(self, HandlerError::Internal { .. })
    }
}

impl From<RecordError> for HandlerError {
    fn from(value: RecordError) -> Self {
        match value {
            RecordError::MissingField(field) => HandlerError::MissingField(field.to_string()),
            coercion @ RecordError::Coercion { .. } => HandlerError::internal("CoercionError", coercion),
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(value: StoreError) -> Self {
        HandlerError::internal("StoreError", value)
    }
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::InvalidJson(err) => write!(f, "{}", err),
            HandlerError::MissingField(field) => write!(f, "missing field '{}'", field),
            HandlerError::Internal { source, .. } => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for HandlerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use store::StoreErrorReason::BackendFailure;
    use store::StoreOperation::PutRecord;

    #[test]
    fn client_errors_are_bad_requests() {
        let invalid: HandlerError =
            HandlerError::InvalidJson(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        let missing: HandlerError = RecordError::MissingField("title").into();

        assert_eq!(StatusCode::BAD_REQUEST, invalid.status_code());
        assert_eq!(StatusCode::BAD_REQUEST, missing.status_code());
        assert_eq!("missing field 'title'", missing.to_string());
        assert!(!missing.is_internal());
    }

    #[test]
    fn coercion_failures_are_internal() {
        let err: HandlerError = RecordError::Coercion {
            field: "year",
            reason: "true is not a number".to_string(),
        }
        .into();

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.status_code());
        assert_eq!("CoercionError", err.error_type());
        assert_eq!("Internal server error", err.client_message());
    }

    #[test]
    fn store_failures_keep_their_detail() {
        let err: HandlerError =
            StoreError::new("abc".to_string(), PutRecord, BackendFailure("timed out".into())).into();

        assert_eq!("StoreError", err.error_type());
        assert!(err.to_string().contains("timed out"));
    }
}
