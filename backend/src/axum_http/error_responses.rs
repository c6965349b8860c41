use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::usecases::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            // Don't leak internal error detail to client
            UseCaseError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
