use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::domain::{ExamRequest, PracticeRequest, ProviderFields};
use crate::presentation::state::AppState;

use super::error_response::{error_response, generation_status};

#[derive(Debug, Deserialize)]
pub struct GenerateExamBody {
    #[serde(flatten)]
    pub request: ExamRequest,
    #[serde(flatten)]
    pub provider: ProviderFields,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePracticeBody {
    #[serde(flatten)]
    pub request: PracticeRequest,
    #[serde(flatten)]
    pub provider: ProviderFields,
}

#[tracing::instrument(skip(state, body), fields(subject = %body.request.subject))]
pub async fn generate_exam_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    Json(body): Json<GenerateExamBody>,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    match state
        .generation_service
        .generate_exam(&body.request, &body.provider)
        .await
    {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Exam generation failed");
            error_response(generation_status(&e), e.to_string())
        }
    }
}

#[tracing::instrument(skip(state, body), fields(question_type = %body.request.question_type))]
pub async fn generate_practice_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    Json(body): Json<GeneratePracticeBody>,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    match state
        .generation_service
        .generate_practice(&body.request, &body.provider)
        .await
    {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Practice generation failed");
            error_response(generation_status(&e), e.to_string())
        }
    }
}
