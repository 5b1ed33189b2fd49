use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;

use crate::application::ports::{
    CompletionRequest, FileLoader, FileLoaderError, GenerationMode, LlmClient, LlmClientError,
    LlmClientFactory,
};
use crate::domain::{
    ContentType, ContentTypeError, ExamDocument, ProgressEvent, ProviderFields,
    ProviderSelectionError, SourceDocument,
};

use super::exam_schema::{SchemaVariant, exam_schema};
use super::fragment_aggregator::{AggregationError, FragmentAggregator};
use super::progress_channel::{ProgressChannel, ProgressError};
use super::prompts::{EXAM_SYSTEM_PROMPT, formatting_prompt, text_parsing_prompt};

const PARSING_MESSAGE: &str = "正在解析文档内容...";
const ANALYZING_MESSAGE: &str = "AI 正在分析试卷结构...";
const FORMATTING_MESSAGE: &str = "正在生成标准排版...";
const REPLY_RECEIVED_MESSAGE: &str = "已收到模型回复，正在整理试卷...";

const TEXT_PARSING_TEMPERATURE: f32 = 0.3;

/// What the caller handed in: an uploaded file or pasted exam text.
#[derive(Debug, Clone)]
pub enum ExtractionInput {
    File {
        data: Bytes,
        filename: String,
        mime: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionRequest {
    pub input: Option<ExtractionInput>,
    pub provider: ProviderFields,
}

/// Prepared model call produced by the analyzing stage.
struct PreparedPrompt {
    request: CompletionRequest,
    source_chars: usize,
}

/// Turns an uploaded exam or pasted text into an [`ExamDocument`], reporting
/// each stage on a [`ProgressChannel`].
pub struct ExtractionService<F, P>
where
    F: FileLoader,
    P: LlmClientFactory + ?Sized,
{
    file_loader: Arc<F>,
    client_factory: Arc<P>,
    max_prompt_chars: usize,
}

impl<F, P> ExtractionService<F, P>
where
    F: FileLoader,
    P: LlmClientFactory + ?Sized,
{
    pub fn new(file_loader: Arc<F>, client_factory: Arc<P>, max_prompt_chars: usize) -> Self {
        Self {
            file_loader,
            client_factory,
            max_prompt_chars,
        }
    }

    /// Runs the pipeline and publishes exactly one terminal event: the
    /// document on success, the error message otherwise. A disconnected
    /// consumer ends the run silently.
    pub async fn run(
        &self,
        request: ExtractionRequest,
        progress: &mut ProgressChannel,
    ) -> Result<ExamDocument, ExtractionError> {
        match self.execute(request, progress).await {
            Ok(document) => {
                progress
                    .publish(ProgressEvent::Complete {
                        data: document.clone(),
                    })
                    .await?;
                Ok(document)
            }
            Err(ExtractionError::Progress(error)) => {
                tracing::info!(error = %error, "Extraction abandoned");
                Err(ExtractionError::Progress(error))
            }
            Err(error) => {
                tracing::warn!(error = %error, stage = %progress.stage(), "Extraction failed");
                if let Err(publish_error) = progress
                    .publish(ProgressEvent::error(error.to_string()))
                    .await
                {
                    tracing::debug!(error = %publish_error, "Error event not delivered");
                }
                Err(error)
            }
        }
    }

    async fn execute(
        &self,
        request: ExtractionRequest,
        progress: &mut ProgressChannel,
    ) -> Result<ExamDocument, ExtractionError> {
        let input = request.input.ok_or(ExtractionError::NoInput)?;

        let prepared = match input {
            ExtractionInput::File {
                data,
                filename,
                mime,
            } => {
                if data.is_empty() {
                    return Err(ExtractionError::NoInput);
                }
                progress.publish(ProgressEvent::parsing(PARSING_MESSAGE)).await?;
                let text = self.extract(&data, filename, mime.as_deref()).await?;

                progress
                    .publish(ProgressEvent::analyzing(ANALYZING_MESSAGE))
                    .await?;
                PreparedPrompt {
                    source_chars: text.chars().count(),
                    request: CompletionRequest::new(formatting_prompt(&text, self.max_prompt_chars))
                        .with_system(EXAM_SYSTEM_PROMPT)
                        .with_schema(exam_schema(SchemaVariant::Formatting)),
                }
            }
            ExtractionInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ExtractionError::NoInput);
                }
                progress
                    .publish(ProgressEvent::analyzing(ANALYZING_MESSAGE))
                    .await?;
                PreparedPrompt {
                    source_chars: text.chars().count(),
                    request: CompletionRequest::new(text_parsing_prompt(&text))
                        .with_system(EXAM_SYSTEM_PROMPT)
                        .with_schema(exam_schema(SchemaVariant::Formatting))
                        .with_temperature(TEXT_PARSING_TEMPERATURE),
                }
            }
        };

        progress
            .publish(ProgressEvent::formatting(FORMATTING_MESSAGE))
            .await?;

        let selection = request.provider.resolve()?;
        let client = self.client_factory.create(&selection);
        tracing::debug!(
            model = client.model(),
            source_chars = prepared.source_chars,
            "Calling model"
        );

        let aggregator = self
            .collect_reply(client.as_ref(), &prepared.request, progress)
            .await?;
        tracing::debug!(
            fragments = aggregator.fragment_count(),
            bytes = aggregator.len(),
            "Model reply complete"
        );

        let mut document: ExamDocument = aggregator.finish()?;
        document.fill_missing_numbers();
        document.normalize_blanks();

        for issue in document.inspect() {
            tracing::warn!(issue = %issue, "Exam document inconsistency");
        }
        tracing::info!(
            sections = document.sections.len(),
            questions = document.question_count(),
            "Exam document parsed"
        );

        Ok(document)
    }

    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    async fn extract(
        &self,
        data: &[u8],
        filename: String,
        mime: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let content_type = ContentType::detect(mime, &filename)?;
        let document = SourceDocument::new(filename, content_type, data.len() as u64);

        let text = self
            .file_loader
            .extract_text(data, &document)
            .await
            .map_err(|e| match e {
                FileLoaderError::UnsupportedContentType(kind) => {
                    ExtractionError::UnsupportedFormat(kind)
                }
                FileLoaderError::ExtractionFailed(reason) => {
                    ExtractionError::ExtractionFailure(reason)
                }
                FileLoaderError::NoTextFound(_) => {
                    ExtractionError::EmptyContent(document.filename.clone())
                }
            })?;

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyContent(document.filename));
        }

        tracing::info!(
            document_id = %document.id.as_uuid(),
            chars = text.chars().count(),
            "Text extracted"
        );
        Ok(text)
    }

    async fn collect_reply(
        &self,
        client: &dyn LlmClient,
        request: &CompletionRequest,
        progress: &mut ProgressChannel,
    ) -> Result<FragmentAggregator, ExtractionError> {
        let mut aggregator = FragmentAggregator::new();

        match client.mode() {
            GenerationMode::SchemaConstrained => {
                let mut fragments = client.complete_stream(request).await?;
                while let Some(fragment) = fragments.next().await {
                    let fragment = fragment?;
                    if fragment.is_empty() {
                        continue;
                    }
                    aggregator.push(&fragment);
                    progress.publish(ProgressEvent::generating(fragment)).await?;
                }
            }
            GenerationMode::ChatCompletion => {
                let reply = client.complete(request).await?;
                aggregator.push(&reply);
                progress
                    .publish(ProgressEvent::formatting(REPLY_RECEIVED_MESSAGE))
                    .await?;
            }
        }

        Ok(aggregator)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("no file or exam text was provided")]
    NoInput,
    #[error("unsupported file type: {0}. Please upload a PDF, DOCX or PPTX file")]
    UnsupportedFormat(String),
    #[error(
        "legacy .ppt files are not supported. Please save the presentation as .pptx and upload it again"
    )]
    LegacyFormat,
    #[error("could not extract text from the file: {0}")]
    ExtractionFailure(String),
    #[error("could not extract any text from {0}")]
    EmptyContent(String),
    #[error("model call failed: {0}")]
    ProviderCallFailure(#[from] LlmClientError),
    #[error("AI output was not valid JSON: {0}")]
    AiOutputNotJson(String),
    #[error("AI output is not an exam document: {0}")]
    AiOutputUnexpectedShape(String),
    #[error("{0}")]
    IncompleteConfiguration(#[from] ProviderSelectionError),
    #[error("progress channel: {0}")]
    Progress(#[from] ProgressError),
}

impl From<ContentTypeError> for ExtractionError {
    fn from(error: ContentTypeError) -> Self {
        match error {
            ContentTypeError::Unsupported(kind) => Self::UnsupportedFormat(kind),
            ContentTypeError::LegacyPowerPoint => Self::LegacyFormat,
        }
    }
}

impl From<AggregationError> for ExtractionError {
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
