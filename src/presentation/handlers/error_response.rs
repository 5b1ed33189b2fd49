use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{ExtractionError, GenerationError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn extraction_status(error: &ExtractionError) -> StatusCode {
    match error {
        ExtractionError::NoInput
        | ExtractionError::UnsupportedFormat(_)
        | ExtractionError::LegacyFormat
        | ExtractionError::IncompleteConfiguration(_) => StatusCode::BAD_REQUEST,
        ExtractionError::ExtractionFailure(_) | ExtractionError::EmptyContent(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ExtractionError::ProviderCallFailure(_)
        | ExtractionError::AiOutputNotJson(_)
        | ExtractionError::AiOutputUnexpectedShape(_) => StatusCode::BAD_GATEWAY,
        ExtractionError::Progress(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn generation_status(error: &GenerationError) -> StatusCode {
    match error {
        GenerationError::EmptyInput(_) | GenerationError::IncompleteConfiguration(_) => {
            StatusCode::BAD_REQUEST
        }
        GenerationError::ProviderCallFailure(_)
        | GenerationError::AiOutputNotJson(_)
        | GenerationError::AiOutputUnexpectedShape(_) => StatusCode::BAD_GATEWAY,
    }
}
