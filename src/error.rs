use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Failure of a route, rendered as `{"error": {"code", "details"?}}`.
///
/// Every check in the request pipeline returns this type, so the mapping from
/// failure to HTTP status lives here and nowhere else.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code} ({status})")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
    }

    pub fn bad_request(code: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code)
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code)
    }

    pub fn forbidden(code: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code)
    }

    pub fn internal(code: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code)
    }

    /// The upstream service could not be reached at all.
    pub fn transport(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, code).with_details(Value::String(message.into()))
    }

    /// The upstream service answered with a non-2xx status; its status and body are kept.
    pub fn upstream(status: u16, code: impl Into<String>, body: Value) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        let error = Self::new(status, code);
        if body.is_null() {
            error
        } else {
            error.with_details(body)
        }
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.code.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

/// Successful route result, rendered as `{"data": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: StatusCode,
    pub data: Value,
}

impl Envelope {
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            status: StatusCode::OK,
            data: data.into(),
        }
    }

    pub fn created(data: impl Into<Value>) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: data.into(),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "data": self.data }))).into_response()
    }
}

pub type ApiResult = Result<Envelope, ApiError>;
