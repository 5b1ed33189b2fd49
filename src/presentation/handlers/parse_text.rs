use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::Instrument;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::application::services::{ExtractionInput, ExtractionRequest, ProgressChannel};
use crate::domain::ProviderFields;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error_response::{error_response, extraction_status};
use super::ndjson_response::ndjson_response;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseTextRequest {
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(flatten)]
    pub provider: ProviderFields,
}

impl From<ParseTextRequest> for ExtractionRequest {
    fn from(body: ParseTextRequest) -> Self {
        Self {
            input: body.text_content.map(ExtractionInput::Text),
            provider: body.provider,
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn parse_text_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    Json(body): Json<ParseTextRequest>,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    log_text(&body);

    let mut progress = ProgressChannel::detached();
    match state
        .extraction_service
        .run(body.into(), &mut progress)
        .await
    {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => error_response(extraction_status(&e), e.to_string()),
    }
}

/// Same pipeline as [`parse_text_handler`], reported as an ndjson stream.
#[tracing::instrument(skip(state, body))]
pub async fn parse_text_stream_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    Json(body): Json<ParseTextRequest>,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    log_text(&body);

    let (mut progress, events) = ProgressChannel::bounded(state.progress_capacity);
    let service = Arc::clone(&state.extraction_service);
    let request = ExtractionRequest::from(body);
    tokio::spawn(
        async move {
            let _ = service.run(request, &mut progress).await;
        }
        .in_current_span(),
    );

    ndjson_response(events)
}

fn log_text(body: &ParseTextRequest) {
    tracing::debug!(
        text = %sanitize_prompt(body.text_content.as_deref().unwrap_or_default()),
        provider = body.provider.provider.as_deref().unwrap_or("default"),
        "Parsing pasted exam text"
    );
}
