use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::domain::{OptimizeRequest, ProviderFields};
use crate::presentation::state::AppState;

use super::error_response::{error_response, generation_status};

#[derive(Debug, Deserialize)]
pub struct OptimizeTopicBody {
    #[serde(flatten)]
    pub request: OptimizeRequest,
    #[serde(flatten)]
    pub provider: ProviderFields,
}

/// Streams the rewritten topic description as plain UTF-8 text. A provider
/// failure mid-stream aborts the body.
#[tracing::instrument(skip(state, body), fields(subject = %body.request.subject))]
pub async fn optimize_topic_handler<F, P, I>(
    State(state): State<AppState<F, P, I>>,
    Json(body): Json<OptimizeTopicBody>,
) -> Response
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    match state
        .generation_service
        .optimize_topic(&body.request, &body.provider)
        .await
    {
        Ok(fragments) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from_stream(fragments.map(|fragment| fragment.map(Bytes::from))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Topic optimization failed");
            error_response(generation_status(&e), e.to_string())
        }
    }
}
