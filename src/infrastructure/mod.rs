pub mod llm;
pub mod observability;
pub mod streaming;
pub mod text_processing;
