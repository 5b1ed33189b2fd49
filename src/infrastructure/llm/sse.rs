use futures::stream::{Stream, StreamExt};

use crate::application::ports::LlmClientError;
use crate::infrastructure::streaming::LineBuffer;

pub const SSE_DONE: &str = "[DONE]";

/// Payload of an SSE `data:` line; comments, ids and blank lines yield `None`.
pub fn sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?;
    Some(data.strip_prefix(' ').unwrap_or(data))
}

/// `data:` payloads of an SSE response body, reassembled across transport
/// chunks. Ends at `[DONE]` or when the body ends.
pub fn sse_payloads<S, B, E>(body: S) -> impl Stream<Item = Result<String, LlmClientError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    async_stream::stream! {
        let mut lines = LineBuffer::new();
        let mut body = Box::pin(body);

        'body: while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(LlmClientError::ApiRequestFailed(e.to_string()));
                    return;
                }
            };

            for line in lines.push(chunk.as_ref()) {
                if let Some(data) = sse_data(&line) {
                    if data == SSE_DONE {
                        break 'body;
                    }
                    yield Ok(data.to_string());
                }
            }
        }

        if let Some(line) = lines.take_remaining() {
            if let Some(data) = sse_data(&line).filter(|d| *d != SSE_DONE) {
                yield Ok(data.to_string());
            }
        }
    }
}
