use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    StoreError,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::StoreError => write!(f, "StoreError"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// One entry of a 422 validation report: where the problem is (`loc`),
/// what went wrong (`msg`), a machine-readable tag (`type`), and the
/// offending input value when one was present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub input: Option<serde_json::Value>,
}

impl ValidationIssue {
    pub fn new(
        loc: impl IntoIterator<Item = impl Into<String>>,
        msg: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
            kind: kind.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }
}

/// Error payload: either a plain message or a list of validation issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<ValidationIssue>),
}

/// The wire envelope every error response carries: `{"detail": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub detail: ErrorDetail,
}

/// Structured application error used across the service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub detail: ErrorDetail,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::NotFound,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::BadRequest,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// A 422 carrying the full issue list collected by the validators.
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            detail: ErrorDetail::Issues(issues),
        }
    }

    /// A 422 carrying a single message, e.g. a store-reported malformed id.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::StoreError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::InternalError,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError => 422,
            AppErrorKind::StoreError => 500,
            AppErrorKind::InternalError => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            detail: self.detail.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            ErrorDetail::Message(message) => write!(f, "{}: {}", self.kind, message),
            ErrorDetail::Issues(issues) => {
                write!(f, "{}: {} validation issue(s)", self.kind, issues.len())
            }
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(AppError::not_found("").status_code_u16(), 404);
        assert_eq!(AppError::bad_request("").status_code_u16(), 400);
        assert_eq!(AppError::validation(vec![]).status_code_u16(), 422);
        assert_eq!(AppError::unprocessable("").status_code_u16(), 422);
        assert_eq!(AppError::store("").status_code_u16(), 500);
        assert_eq!(AppError::internal("").status_code_u16(), 500);
    }

    #[test]
    fn message_detail_serializes_as_string() {
        let body = AppError::not_found("Offence not found: abc").body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["detail"], "Offence not found: abc");
    }

    #[test]
    fn issue_detail_serializes_as_array() {
        let issue = ValidationIssue::new(["age_at_offence"], "Input should be between 10 and 120", "int_range")
            .with_input(serde_json::json!(7));
        let body = AppError::validation(vec![issue]).body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["detail"][0]["loc"][0], "age_at_offence");
        assert_eq!(json["detail"][0]["type"], "int_range");
        assert_eq!(json["detail"][0]["input"], 7);
    }

    #[test]
    fn issue_without_input_omits_the_field() {
        let issue = ValidationIssue::new(Vec::<String>::new(), "boom", "value_error");
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("input").is_none());
    }

    #[test]
    fn error_body_roundtrip_through_json() {
        let issue = ValidationIssue::new(["plea_stage"], "bad", "literal_error");
        let body = AppError::validation(vec![issue]).body();
        let json = serde_json::to_string(&body).unwrap();
        let parsed: ErrorBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body, parsed);
    }

    #[test]
    fn display_impl_formats_correctly() {
        let err = AppError::bad_request("Invalid JSON body");
        assert_eq!(format!("{}", err), "BadRequest: Invalid JSON body");
    }
}
