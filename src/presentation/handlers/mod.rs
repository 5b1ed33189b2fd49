mod error_response;
mod format_exam;
mod generate;
mod health;
mod ndjson_response;
mod optimize_topic;
mod parse_text;

pub use error_response::{ErrorResponse, error_response, extraction_status, generation_status};
pub use format_exam::format_exam_handler;
pub use generate::{
    GenerateExamBody, GeneratePracticeBody, generate_exam_handler, generate_practice_handler,
};
pub use health::health_handler;
pub use ndjson_response::ndjson_response;
pub use optimize_topic::{OptimizeTopicBody, optimize_topic_handler};
pub use parse_text::{ParseTextRequest, parse_text_handler, parse_text_stream_handler};
