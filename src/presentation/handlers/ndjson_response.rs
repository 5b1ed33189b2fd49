use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::ProgressEvent;
use crate::infrastructure::streaming::{NDJSON_CONTENT_TYPE, NdjsonEncoder};

/// Streams progress events as they are published, one JSON object per line.
/// The body ends when the pipeline drops its sender.
pub fn ndjson_response(events: mpsc::Receiver<ProgressEvent>) -> Response {
    let encoder = NdjsonEncoder;
    let lines = ReceiverStream::new(events).map(move |event| encoder.encode(&event));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, NDJSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache, no-transform"),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}
