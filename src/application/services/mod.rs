mod exam_schema;
mod extraction_service;
mod fragment_aggregator;
mod generation_service;
mod progress_channel;
mod prompts;

pub use exam_schema::{SchemaVariant, exam_schema};
pub use extraction_service::{
    ExtractionError, ExtractionInput, ExtractionRequest, ExtractionService,
};
pub use fragment_aggregator::{AggregationError, FragmentAggregator};
pub use generation_service::{GenerationError, GenerationService};
pub use progress_channel::{ProgressChannel, ProgressError};
pub use prompts::{
    EXAM_SYSTEM_PROMPT, exam_generation_prompt, formatting_prompt, illustration_prompt,
    practice_generation_prompt, text_parsing_prompt, topic_rewrite_prompt, truncate_chars,
};
