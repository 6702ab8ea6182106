use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    ValidationFailed,
    PropertyNotFound,
    InquiryNotFound,
    DirectorNotFound,
    Unauthorized,
    RegistrationClosed,
    UsernameTaken,
    PayloadTooLarge,
    NotReady,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: "req-unknown".to_string(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
        )
    }

    #[must_use]
    pub fn unrecognized_param(name: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("unrecognized query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "unrecognized"}]}),
        )
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
        )
    }

    #[must_use]
    pub fn property_not_found(id: i64) -> Self {
        Self::new(
            ApiErrorCode::PropertyNotFound,
            "property not found",
            json!({"id": id}),
        )
    }

    #[must_use]
    pub fn inquiry_not_found(id: i64) -> Self {
        Self::new(
            ApiErrorCode::InquiryNotFound,
            "inquiry not found",
            json!({"id": id}),
        )
    }

    #[must_use]
    pub fn director_not_found(id: i64) -> Self {
        Self::new(
            ApiErrorCode::DirectorNotFound,
            "director not found",
            json!({"id": id}),
        )
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            "authentication required",
            Value::Null,
        )
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
};
