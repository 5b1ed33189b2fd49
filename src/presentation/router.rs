use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    format_exam_handler, generate_exam_handler, generate_practice_handler, health_handler,
    optimize_topic_handler, parse_text_handler, parse_text_stream_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<F, P, I>(state: AppState<F, P, I>) -> Router
where
    F: FileLoader + 'static,
    P: LlmClientFactory + ?Sized + 'static,
    I: ImageGenerator + ?Sized + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/format-exam", post(format_exam_handler::<F, P, I>))
        .route("/api/parse-text", post(parse_text_handler::<F, P, I>))
        .route(
            "/api/parse-text/stream",
            post(parse_text_stream_handler::<F, P, I>),
        )
        .route("/api/generate-exam", post(generate_exam_handler::<F, P, I>))
        .route(
            "/api/generate-practice",
            post(generate_practice_handler::<F, P, I>),
        )
        .route(
            "/api/optimize-topic",
            post(optimize_topic_handler::<F, P, I>),
        )
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
