//! Maps the core error taxonomy onto HTTP responses
//!
//! Every error leaves as `{"status":"error","message":...}` with the
//! status code dictated by the error kind. Messages carry only the
//! opaque provider text needed for diagnosis, never internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dyndns_core::Error;
use serde_json::json;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Discovery failure is reported like bad input: the caller
            // asked for an address the machine doesn't have.
            Error::InvalidInput(_) | Error::AddressUnavailable(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::ZoneNotFound(_) | Error::RecordNotFound(_) => StatusCode::NOT_FOUND,
            Error::ProviderUnavailable(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
