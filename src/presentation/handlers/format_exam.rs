use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;
use tracing::Instrument;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::application::services::{ExtractionInput, ExtractionRequest, ProgressChannel};
use crate::presentation::state::AppState;

use super::error_response::error_response;
use super::ndjson_response::ndjson_response;

const FILE_FIELD: &str = "file";

/// Accepts a multipart upload and streams the extraction as ndjson. Pipeline
/// failures, including a missing or unsupported file, arrive as the final
/// `error` event of a 200 response.
#[tracing::instrument(skip(state, multipart))]
pub async fn format_exam_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    multipart: Multipart,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    let request = match read_upload(multipart).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read multipart");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart: {}", e),
            );
        }
    };

    let (mut progress, events) = ProgressChannel::bounded(state.progress_capacity);
    let service = Arc::clone(&state.extraction_service);
    tokio::spawn(
        async move {
            let _ = service.run(request, &mut progress).await;
        }
        .in_current_span(),
    );

    ndjson_response(events)
}

async fn read_upload(
    mut multipart: Multipart,
) -> Result<ExtractionRequest, axum::extract::multipart::MultipartError> {
    let mut request = ExtractionRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let mime = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            tracing::debug!(
                filename = %filename,
                content_type = mime.as_deref().unwrap_or("-"),
                bytes = data.len(),
                "File received"
            );
            request.input = Some(ExtractionInput::File {
                data,
                filename,
                mime,
            });
        } else {
            let value = field.text().await?;
            if !request.provider.set(&name, value) {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(request)
}
