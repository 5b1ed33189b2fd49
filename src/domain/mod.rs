mod blank_normalizer;
mod document;
mod exam;
mod generation_request;
mod lenient;
mod pipeline_stage;
mod progress_event;
mod provider_selection;

pub use blank_normalizer::{BLANK_PLACEHOLDER, MIN_BLANK_WIDTH, normalize_blanks};
pub use document::{ContentType, ContentTypeError, DocumentId, SourceDocument};
pub use exam::{ExamDocument, ModelIssue, Question, QuestionType, Section};
pub use generation_request::{Difficulty, ExamRequest, OptimizeRequest, PracticeRequest};
pub use pipeline_stage::PipelineStage;
pub use progress_event::ProgressEvent;
pub use provider_selection::{
    OPENAI_PROVIDER, OpenAiEndpoint, ProviderFields, ProviderSelection, ProviderSelectionError,
};
