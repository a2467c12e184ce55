//! Problem+json error responses for the hook API.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dispatch::DispatchError;
use crate::multipart::DecodeError;

/// RFC 7807 style error body.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

impl ProblemDetails {
    fn new(status: StatusCode, code: impl Into<String>, detail: impl Into<String>) -> Self {
        let code = code.into();
        let title = status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string();
        Self {
            r#type: format!("https://alloc-bridge.dev/problems/{code}"),
            title,
            status: status.as_u16(),
            detail: detail.into(),
            code,
        }
    }
}

/// An error response produced by a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub problem: ProblemDetails,
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        let status = StatusCode::BAD_REQUEST;
        let problem = ProblemDetails::new(status, code, message);
        Self { status, problem }
    }

    pub fn unprocessable(code: impl Into<String>, message: impl Into<String>) -> Self {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        let problem = ProblemDetails::new(status, code, message);
        Self { status, problem }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.problem)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::ContentLength
            | DecodeError::ContentLengthMismatch { .. }
            | DecodeError::Boundary
            | DecodeError::Malformed(_) => {
                ApiError::bad_request("invalid-hook-request", err.to_string())
            }
            DecodeError::MissingField(_) | DecodeError::FieldEncoding => {
                ApiError::unprocessable("incomplete-hook-body", err.to_string())
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError::unprocessable("invalid-hook-payload", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_to_the_right_status() {
        assert_eq!(
            ApiError::from(DecodeError::Boundary).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DecodeError::MissingField("value")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn problem_body_carries_code_and_detail() {
        let err = ApiError::bad_request("invalid-hook-request", "no boundary");
        assert_eq!(err.problem.code, "invalid-hook-request");
        assert_eq!(err.problem.detail, "no boundary");
        assert_eq!(err.problem.status, 400);
    }
}
