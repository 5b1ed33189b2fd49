use std::marker::PhantomData;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::line_buffer::LineBuffer;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Writes one JSON value per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NdjsonEncoder;

impl NdjsonEncoder {
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Bytes, serde_json::Error> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        Ok(Bytes::from(line))
    }
}

/// Typed reader for an ndjson byte stream. Only complete lines are decoded;
/// a trailing partial line waits for more bytes.
#[derive(Debug)]
pub struct NdjsonDecoder<T> {
    lines: LineBuffer,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for NdjsonDecoder<T> {
    fn default() -> Self {
        Self {
            lines: LineBuffer::new(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> NdjsonDecoder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<T, serde_json::Error>> {
        self.lines
            .push(chunk)
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line))
            .collect()
    }

    /// Decodes an unterminated last record once the stream has ended.
    pub fn finish(mut self) -> Option<Result<T, serde_json::Error>> {
        self.lines
            .take_remaining()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(&line))
    }
}
