mod line_buffer;
mod ndjson;

pub use line_buffer::LineBuffer;
pub use ndjson::{NDJSON_CONTENT_TYPE, NdjsonDecoder, NdjsonEncoder};
