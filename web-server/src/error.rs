use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jokes_core::{CoreError, DatabaseError, ErrorExt};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CoreError::Database(
                DatabaseError::DatabaseLocked | DatabaseError::ConnectionFailed { .. },
            ) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log_error();

        let body = ErrorResponse {
            error: ErrorDetail {
                message: self.0.user_friendly_message(),
                code: self.0.error_code(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}
