use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rand::Rng;

use crate::application::ports::{
    CompletionRequest, FragmentStream, ImageGenerator, LlmClientError, LlmClientFactory,
};
use crate::domain::{
    ExamDocument, ExamRequest, OptimizeRequest, PracticeRequest, ProviderFields,
    ProviderSelectionError,
};

use super::exam_schema::{SchemaVariant, exam_schema};
use super::fragment_aggregator::{AggregationError, FragmentAggregator};
use super::prompts::{
    EXAM_SYSTEM_PROMPT, exam_generation_prompt, illustration_prompt, practice_generation_prompt,
    topic_rewrite_prompt,
};

const GENERATION_TEMPERATURE: f32 = 0.4;

/// Upper bound of the random delay before each illustration request starts.
pub const DEFAULT_IMAGE_START_JITTER: Duration = Duration::from_millis(500);

/// Creates exams and drills from a topic description, and rewrites rough
/// topic notes.
pub struct GenerationService<P, I>
where
    P: LlmClientFactory + ?Sized,
    I: ImageGenerator + ?Sized,
{
    client_factory: Arc<P>,
    image_generator: Arc<I>,
    image_start_jitter: Duration,
}

impl<P, I> GenerationService<P, I>
where
    P: LlmClientFactory + ?Sized,
    I: ImageGenerator + ?Sized,
{
    pub fn new(client_factory: Arc<P>, image_generator: Arc<I>) -> Self {
        Self {
            client_factory,
            image_generator,
            image_start_jitter: DEFAULT_IMAGE_START_JITTER,
        }
    }

    pub fn with_image_start_jitter(mut self, jitter: Duration) -> Self {
        self.image_start_jitter = jitter;
        self
    }

    #[tracing::instrument(skip(self, request, provider), fields(subject = %request.subject))]
    pub async fn generate_exam(
        &self,
        request: &ExamRequest,
        provider: &ProviderFields,
    ) -> Result<ExamDocument, GenerationError> {
        require(&request.topic_description, "topicDescription")?;

        let completion = CompletionRequest::new(exam_generation_prompt(request))
            .with_system(EXAM_SYSTEM_PROMPT)
            .with_schema(exam_schema(SchemaVariant::TextDiagram))
            .with_temperature(GENERATION_TEMPERATURE);

        self.complete_document(&completion, provider).await
    }

    /// Generates a one-section drill, then illustrates every question that
    /// carries an image prompt. Illustration failures leave the question
    /// without a picture.
    #[tracing::instrument(
        skip(self, request, provider),
        fields(question_type = %request.question_type, count = request.count)
    )]
    pub async fn generate_practice(
        &self,
        request: &PracticeRequest,
        provider: &ProviderFields,
    ) -> Result<ExamDocument, GenerationError> {
        require(&request.topic_description, "topicDescription")?;
        if request.count == 0 {
            return Err(GenerationError::EmptyInput("count"));
        }

        let completion = CompletionRequest::new(practice_generation_prompt(request))
            .with_system(EXAM_SYSTEM_PROMPT)
            .with_schema(exam_schema(SchemaVariant::Practice))
            .with_temperature(GENERATION_TEMPERATURE);

        let mut document = self.complete_document(&completion, provider).await?;

        if request.is_geometry() {
            let missing = document
                .questions()
                .filter(|q| q.image_prompt.as_deref().is_none_or(|p| p.trim().is_empty()))
                .count();
            if missing > 0 {
                tracing::warn!(missing, "Geometry questions without image prompt");
            }
        }

        self.illustrate(&mut document).await;
        Ok(document)
    }

    /// Streams a rewritten topic description as plain text fragments.
    #[tracing::instrument(skip(self, request, provider), fields(subject = %request.subject))]
    pub async fn optimize_topic(
        &self,
        request: &OptimizeRequest,
        provider: &ProviderFields,
    ) -> Result<FragmentStream, GenerationError> {
        require(&request.raw_input, "rawInput")?;

        let selection = provider.resolve()?;
        let client = self.client_factory.create(&selection);
        let completion = CompletionRequest::new(topic_rewrite_prompt(request));

        Ok(client.complete_stream(&completion).await?)
    }

    async fn complete_document(
        &self,
        completion: &CompletionRequest,
        provider: &ProviderFields,
    ) -> Result<ExamDocument, GenerationError> {
        let selection = provider.resolve()?;
        let client = self.client_factory.create(&selection);
        tracing::debug!(model = client.model(), "Calling model");

        let reply = client.complete(completion).await?;
        let mut aggregator = FragmentAggregator::new();
        aggregator.push(&reply);

        let mut document: ExamDocument = aggregator.finish()?;
        document.fill_missing_numbers();
        document.normalize_blanks();
        for issue in document.inspect() {
            tracing::warn!(issue = %issue, "Exam document inconsistency");
        }
        tracing::info!(
            sections = document.sections.len(),
            questions = document.question_count(),
            "Exam generated"
        );

        Ok(document)
    }

    async fn illustrate(&self, document: &mut ExamDocument) {
        let jobs: Vec<_> = document
            .sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .filter_map(|question| {
                let prompt = question
                    .image_prompt
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(illustration_prompt)?;
                Some((question, prompt))
            })
            .collect();

        if jobs.is_empty() {
            return;
        }

        let requested = jobs.len();
        let delays = start_delays(requested, self.image_start_jitter);
        let generator = &self.image_generator;
        let outcomes = join_all(jobs.into_iter().zip(delays).map(
            |((question, prompt), delay)| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match generator.generate(&prompt).await {
                    Ok(image) => {
                        question.image_url = Some(image.to_data_url());
                        true
                    }
                    Err(e) => {
                        tracing::warn!(question_id = question.id, error = %e, "Illustration failed");
                        false
                    }
                }
            },
        ))
        .await;

        let generated = outcomes.into_iter().filter(|ok| *ok).count();
        tracing::info!(requested, generated, "Illustrations finished");
    }
}

/// Spreads simultaneous illustration requests over `[0, max]`.
fn start_delays(count: usize, max: Duration) -> Vec<Duration> {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return vec![Duration::ZERO; count];
    }
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| Duration::from_millis(rng.gen_range(0..=max_ms)))
        .collect()
}

fn require(value: &str, field: &'static str) -> Result<(), GenerationError> {
    if value.trim().is_empty() {
        return Err(GenerationError::EmptyInput(field));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{0} is required")]
    EmptyInput(&'static str),
    #[error("{0}")]
    IncompleteConfiguration(#[from] ProviderSelectionError),
    #[error("model call failed: {0}")]
    ProviderCallFailure(#[from] LlmClientError),
    #[error("AI output was not valid JSON: {0}")]
    AiOutputNotJson(String),
    #[error("AI output is not an exam document: {0}")]
    AiOutputUnexpectedShape(String),
}

impl From<AggregationError> for GenerationError {
    fn from(error: AggregationError) -> Self {
        match error {
            AggregationError::Empty | AggregationError::NotJson(_) => {
                Self::AiOutputNotJson(error.to_string())
            }
            AggregationError::NotAnObject(_) | AggregationError::ShapeMismatch(_) => {
                Self::AiOutputUnexpectedShape(error.to_string())
            }
        }
    }
}
