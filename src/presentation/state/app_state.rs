use std::sync::Arc;

use crate::application::ports::{FileLoader, ImageGenerator, LlmClientFactory};
use crate::application::services::{ExtractionService, GenerationService};

pub const DEFAULT_PROGRESS_CAPACITY: usize = 64;

pub struct AppState<F, P, I>
where
    F: FileLoader,
    P: LlmClientFactory + ?Sized,
    I: ImageGenerator + ?Sized,
{
    pub extraction_service: Arc<ExtractionService<F, P>>,
    pub generation_service: Arc<GenerationService<P, I>>,
    pub max_upload_bytes: usize,
    /// Progress events buffered per request before the pipeline waits on
    /// the client.
    pub progress_capacity: usize,
}

impl<F, P, I> AppState<F, P, I>
where
    F: FileLoader,
    P: LlmClientFactory + ?Sized,
    I: ImageGenerator + ?Sized,
{
    pub fn new(
        extraction_service: Arc<ExtractionService<F, P>>,
        generation_service: Arc<GenerationService<P, I>>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            extraction_service,
            generation_service,
            max_upload_bytes,
            progress_capacity: DEFAULT_PROGRESS_CAPACITY,
        }
    }
}

impl<F, P, I> Clone for AppState<F, P, I>
where
    F: FileLoader,
    P: LlmClientFactory + ?Sized,
    I: ImageGenerator + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
            generation_service: Arc::clone(&self.generation_service),
            max_upload_bytes: self.max_upload_bytes,
            progress_capacity: self.progress_capacity,
        }
    }
}
