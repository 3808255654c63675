//! Module for the results of remote operations.

use crate::Error;
use reqwest::StatusCode;
use std::error::Error as StdError;

/// The outcome of executing a [`RemoteOperation`](crate::RemoteOperation).
///
/// Operations never return errors directly. A transport or parse error is captured in
/// [`Failure::error`](Self::Failure), and a response whose status code is not accepted by the
/// operation is reported as a failure that keeps the status code but carries no error.
#[derive(Debug)]
pub enum RemoteOperationResult<T> {
    /// The server answered with a status code accepted by the operation.
    Success { status: StatusCode, data: T },
    /// The request could not be completed or the server rejected it.
    Failure {
        status: Option<StatusCode>,
        log_message: String,
        error: Option<Error>,
    },
}

impl<T> RemoteOperationResult<T> {
    /// Creates a result from the status code of a completed request.
    ///
    /// `data` is only evaluated when `accepted` returns `true` for the status code.
    pub fn from_status<A, D>(status: StatusCode, accepted: A, data: D) -> Self
    where
        A: FnOnce(StatusCode) -> bool,
        D: FnOnce() -> T,
    {
        if accepted(status) {
            Self::Success {
                status,
                data: data(),
            }
        } else {
            Self::rejected(status)
        }
    }

    /// Creates a failed result for a status code that is not accepted.
    pub fn rejected(status: StatusCode) -> Self {
        Self::Failure {
            status: Some(status),
            log_message: format!("server returned unexpected status {}", status),
            error: None,
        }
    }

    /// Creates a failed result from an error.
    pub fn from_error(error: Error) -> Self {
        let status = error.status();
        Self::from_error_with_status(status, error)
    }

    /// Creates a failed result from an error that occurred after the server answered with
    /// `status`, e.g. while parsing the body.
    pub fn from_error_with_status(status: Option<StatusCode>, error: Error) -> Self {
        let mut messages = vec![error.to_string()];
        let mut source = error.source();
        while let Some(e) = source {
            messages.push(e.to_string());
            source = e.source();
        }
        let log_message = messages
            .iter()
            .map(|v| v.trim_end_matches('.'))
            .collect::<Vec<_>>()
            .join(": ");
        Self::Failure {
            status,
            log_message,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the HTTP status code, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Success { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Converts the result into a standard [`Result`](std::result::Result), keeping the whole
    /// failure as error value.
    pub fn into_result(self) -> std::result::Result<T, Self> {
        match self {
            Self::Success { data, .. } => Ok(data),
            failure => Err(failure),
        }
    }

    /// Returns the captured error of a failed result.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => error.as_ref(),
        }
    }

    /// Returns a human-readable description of the outcome.
    pub fn log_message(&self) -> String {
        match self {
            Self::Success { status, .. } => format!("operation finished with status {}", status),
            Self::Failure { log_message, .. } => log_message.clone(),
        }
    }

    /// Maps the payload of a successful result.
    pub fn map<U, F>(self, f: F) -> RemoteOperationResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { status, data } => RemoteOperationResult::Success {
                status,
                data: f(data),
            },
            Self::Failure {
                status,
                log_message,
                error,
            } => RemoteOperationResult::Failure {
                status,
                log_message,
                error,
            },
        }
    }
}

impl<T> From<Error> for RemoteOperationResult<T> {
    fn from(error: Error) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_status_is_success() {
        let result = RemoteOperationResult::from_status(StatusCode::OK, |v| v.is_success(), || 42);
        assert!(result.is_success());
        assert_eq!(result.status(), Some(StatusCode::OK));
        assert_eq!(result.data(), Some(&42));
        assert!(result.error().is_none());
    }

    #[test]
    fn rejected_status_keeps_code_without_error() {
        let result = RemoteOperationResult::<()>::from_status(
            StatusCode::NOT_FOUND,
            |v| v == StatusCode::OK,
            || unreachable!("payload must not be built for a rejected status"),
        );
        assert!(!result.is_success());
        assert_eq!(result.status(), Some(StatusCode::NOT_FOUND));
        assert!(result.error().is_none());
        assert!(result.log_message().contains("404"));
    }

    #[test]
    fn error_is_captured() {
        let result = RemoteOperationResult::<()>::from_error(Error::InvalidPath("foo".to_owned()));
        assert!(!result.is_success());
        assert_eq!(result.status(), None);
        assert!(matches!(result.error(), Some(Error::InvalidPath(v)) if v == "foo"));
        assert_eq!(result.log_message(), "Remote path `foo` is not absolute");
    }

    #[test]
    fn parse_error_keeps_status() {
        let result = RemoteOperationResult::<()>::from_error_with_status(
            Some(StatusCode::MULTI_STATUS),
            Error::EmptyResponse,
        );
        assert_eq!(result.status(), Some(StatusCode::MULTI_STATUS));
        assert!(matches!(result.error(), Some(Error::EmptyResponse)));
    }

    #[test]
    fn map_keeps_failure() {
        let result = RemoteOperationResult::<u8>::rejected(StatusCode::CONFLICT).map(|v| v + 1);
        assert_eq!(result.status(), Some(StatusCode::CONFLICT));
        assert!(result.into_data().is_none());
    }

    #[test]
    fn into_result_keeps_failure() {
        let result = RemoteOperationResult::<()>::rejected(StatusCode::NOT_FOUND).into_result();
        assert_eq!(result.unwrap_err().status(), Some(StatusCode::NOT_FOUND));
        let result = RemoteOperationResult::from_status(StatusCode::OK, |_| true, || 1);
        assert_eq!(result.into_result().unwrap(), 1);
    }
}
