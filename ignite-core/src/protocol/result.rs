//! Outcome of a single API call.

use super::message::{Response, ResponseBody};
use crate::error::{IgniteError, Result};
use crate::serialization::Record;

const SUCCESS_MESSAGE: &str = "Success";

/// Status, error text and decoded value of one request.
///
/// On success `error()` is `None`; on failure the error text is always
/// present and non-empty and there is no value.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    query_id: i64,
    status: i32,
    error: Option<String>,
    value: Option<T>,
}

impl ApiResult<Record> {
    /// Builds the result of a decoded response.
    pub fn from_response(response: Response) -> Self {
        match response.body {
            ResponseBody::Success(record) => Self {
                query_id: response.query_id,
                status: response.status,
                error: None,
                value: Some(record),
            },
            ResponseBody::Failure(message) => {
                let message = if message.is_empty() {
                    format!("request failed with status {}", response.status)
                } else {
                    message
                };
                Self {
                    query_id: response.query_id,
                    status: response.status,
                    error: Some(message),
                    value: None,
                }
            }
        }
    }
}

impl<T> ApiResult<T> {
    /// Returns the query id echoed by the server.
    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    /// Returns the response status; zero on success.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Returns true if the status is zero.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the error text of a failed call.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `"Success"` or the error text.
    pub fn message(&self) -> &str {
        self.error.as_deref().unwrap_or(SUCCESS_MESSAGE)
    }

    /// Returns the decoded value.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consumes the result and returns the decoded value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Maps the value of a successful result.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResult<U> {
        ApiResult {
            query_id: self.query_id,
            status: self.status,
            error: self.error,
            value: self.value.map(f),
        }
    }

    /// Drops the value, keeping status and error text. Used by operations
    /// whose success carries no value.
    pub fn without_value<U>(self) -> ApiResult<U> {
        ApiResult {
            query_id: self.query_id,
            status: self.status,
            error: self.error,
            value: None,
        }
    }

    /// Maps the value with a fallible conversion.
    pub fn try_map<U, F: FnOnce(T) -> Result<U>>(self, f: F) -> Result<ApiResult<U>> {
        Ok(ApiResult {
            query_id: self.query_id,
            status: self.status,
            error: self.error,
            value: self.value.map(f).transpose()?,
        })
    }

    /// Converts a failed result into [`IgniteError::Status`].
    pub fn into_result(self) -> Result<Option<T>> {
        match self.error {
            None => Ok(self.value),
            Some(message) => Err(IgniteError::Status {
                status: self.status,
                message,
            }),
        }
    }
}
