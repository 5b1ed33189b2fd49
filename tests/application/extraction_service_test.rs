use std::sync::Arc;

use bytes::Bytes;
use paperforge::application::ports::{GenerationMode, LlmClient};
use paperforge::application::services::{
    ExtractionError, ExtractionInput, ExtractionRequest, ProgressChannel, ProgressError,
};
use paperforge::domain::{
    PipelineStage, ProgressEvent, ProviderFields, ProviderSelection, ProviderSelectionError,
    QuestionType,
};
use tokio::sync::mpsc;

use crate::helpers::{
    StubClientFactory, StubLlmClient, docx_bytes, extraction_service, sample_exam_json,
};

fn file_request(data: Vec<u8>, filename: &str, mime: Option<&str>) -> ExtractionRequest {
    ExtractionRequest {
        input: Some(ExtractionInput::File {
            data: Bytes::from(data),
            filename: filename.to_string(),
            mime: mime.map(str::to_string),
        }),
        provider: ProviderFields::default(),
    }
}

fn text_request(text: &str) -> ExtractionRequest {
    ExtractionRequest {
        input: Some(ExtractionInput::Text(text.to_string())),
        provider: ProviderFields::default(),
    }
}

fn split(text: &str, parts: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len().div_ceil(parts);
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

async fn drain(mut rx: mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn stages(events: &[ProgressEvent]) -> Vec<PipelineStage> {
    events.iter().map(ProgressEvent::stage).collect()
}

#[tokio::test]
async fn given_docx_upload_when_running_then_stages_in_order_and_single_complete() {
    let json = sample_exam_json();
    let fragments = split(&json, 4);
    let fragment_refs: Vec<&str> = fragments.iter().map(String::as_str).collect();
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&fragment_refs)));
    let service = extraction_service(Arc::clone(&factory));
    let (mut progress, rx) = ProgressChannel::bounded(64);

    let request = file_request(docx_bytes(&["1. What is 2+2?"]), "paper.docx", None);
    let document = service.run(request, &mut progress).await.unwrap();
    drop(progress);
    let events = drain(rx).await;

    assert_eq!(
        stages(&events),
        vec![
            PipelineStage::Parsing,
            PipelineStage::Analyzing,
            PipelineStage::Formatting,
            PipelineStage::Generating,
            PipelineStage::Generating,
            PipelineStage::Generating,
            PipelineStage::Generating,
            PipelineStage::Complete,
        ]
    );
    assert_eq!(events[0], ProgressEvent::parsing("正在解析文档内容..."));

    let chunks: String = events
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::Generating { chunk } => Some(chunk.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(chunks, json);

    let ProgressEvent::Complete { data } = events.last().unwrap() else {
        panic!("expected a complete event");
    };
    assert_eq!(data, &document);
    assert_eq!(document.sections[1].questions[0].text, "3 + 5 = （ ______________ ）");
    assert_eq!(factory.selections(), vec![ProviderSelection::Default]);
}

fn single_choice_json() -> String {
    serde_json::json!({
        "title": "Arithmetic",
        "subject": "Math",
        "sections": [{
            "title": "Multiple choice",
            "totalScore": 5,
            "questions": [{
                "id": 1,
                "number": 1,
                "text": "What is 2+2?",
                "type": "multiple_choice",
                "score": 5,
                "options": ["3", "4", "5"]
            }]
        }]
    })
    .to_string()
}

#[tokio::test]
async fn given_pdf_upload_when_running_then_stages_in_order_and_single_choice_document() {
    let json = single_choice_json();
    let fragments = split(&json, 3);
    let fragment_refs: Vec<&str> = fragments.iter().map(String::as_str).collect();
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&fragment_refs)));
    let service = extraction_service(Arc::clone(&factory));
    let data = std::fs::read(format!(
        "{}/tests/fixtures/sample.pdf",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let (mut progress, rx) = ProgressChannel::bounded(64);

    service
        .run(file_request(data, "sample.pdf", Some("application/pdf")), &mut progress)
        .await
        .unwrap();
    drop(progress);
    let events = drain(rx).await;

    assert_eq!(
        stages(&events),
        vec![
            PipelineStage::Parsing,
            PipelineStage::Analyzing,
            PipelineStage::Formatting,
            PipelineStage::Generating,
            PipelineStage::Generating,
            PipelineStage::Generating,
            PipelineStage::Complete,
        ]
    );

    let ProgressEvent::Complete { data } = events.last().unwrap() else {
        panic!("expected a complete event");
    };
    assert_eq!(data.sections.len(), 1);
    assert_eq!(data.sections[0].questions.len(), 1);
    let question = &data.sections[0].questions[0];
    assert_eq!(question.question_type, QuestionType::MultipleChoice);
    assert_eq!(
        question.options,
        Some(vec!["3".to_string(), "4".to_string(), "5".to_string()])
    );

    let request = factory.client().last_request().unwrap();
    assert!(request.prompt.contains("What is 2+2?"));
    assert!(request.prompt.contains("B. 4"));
    assert!(request.response_schema.is_some());
    assert!(request.system.is_some());
}

#[tokio::test]
async fn given_legacy_ppt_when_running_then_error_event_and_no_model_call() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&["{}"])));
    let service = extraction_service(Arc::clone(&factory));
    let (mut progress, rx) = ProgressChannel::bounded(16);

    let result = service
        .run(file_request(vec![1, 2, 3], "lesson.ppt", None), &mut progress)
        .await;
    drop(progress);
    let events = drain(rx).await;

    assert!(matches!(result, Err(ExtractionError::LegacyFormat)));
    assert_eq!(stages(&events), vec![PipelineStage::Parsing, PipelineStage::Error]);
    let ProgressEvent::Error { message } = &events[1] else {
        panic!("expected an error event");
    };
    assert!(message.contains(".pptx"));
    assert_eq!(factory.client().calls(), 0);
    assert!(factory.selections().is_empty());
}

#[tokio::test]
async fn given_non_json_reply_when_running_then_error_and_never_complete() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&[
        "Sure! Here is ",
        "your exam.",
    ])));
    let service = extraction_service(factory);
    let (mut progress, rx) = ProgressChannel::bounded(16);

    let result = service
        .run(text_request("1. 2 + 2 = ?"), &mut progress)
        .await;
    drop(progress);
    let events = drain(rx).await;

    assert!(matches!(result, Err(ExtractionError::AiOutputNotJson(_))));
    assert_eq!(events.last().map(ProgressEvent::stage), Some(PipelineStage::Error));
    assert!(!events.iter().any(|e| matches!(e, ProgressEvent::Complete { .. })));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn given_parseable_off_schema_reply_when_running_then_document_completes() {
    let reply = serde_json::json!({
        "title": "阅读练习",
        "sections": [{
            "title": "阅读",
            "totalScore": "5",
            "questions": [
                { "text": "读短文，回答问题。", "type": "reading", "score": 2.5 },
                { "id": 7, "number": 2, "text": "选出正确答案", "type": "Multiple_Choice",
                  "score": 2, "options": [1, 2, 3] },
                "stray note"
            ]
        }]
    })
    .to_string();
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::chat(&reply)));
    let service = extraction_service(factory);
    let (mut progress, rx) = ProgressChannel::bounded(16);

    let document = service
        .run(text_request("阅读短文"), &mut progress)
        .await
        .unwrap();
    drop(progress);
    let events = drain(rx).await;

    assert!(matches!(events.last(), Some(ProgressEvent::Complete { .. })));
    assert_eq!(document.subject, "");
    let section = &document.sections[0];
    assert_eq!(section.total_score, 5);
    assert_eq!(section.questions.len(), 2);

    let reading = &section.questions[0];
    assert_eq!(reading.question_type, QuestionType::Other("reading".to_string()));
    assert_eq!(reading.score, 3);
    assert_eq!((reading.id, reading.number), (1, 1));

    let choice = &section.questions[1];
    assert_eq!(choice.question_type, QuestionType::MultipleChoice);
    assert_eq!((choice.id, choice.number), (7, 2));
    assert_eq!(
        choice.options,
        Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
    );
}

#[tokio::test]
async fn given_json_array_reply_when_running_then_unexpected_shape_error() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::chat(r#"[{"title":"T"}]"#)));
    let service = extraction_service(factory);
    let (mut progress, rx) = ProgressChannel::bounded(16);

    let result = service.run(text_request("1. 2 + 2 = ?"), &mut progress).await;
    drop(progress);
    let events = drain(rx).await;

    assert!(matches!(
        result,
        Err(ExtractionError::AiOutputUnexpectedShape(_))
    ));
    let ProgressEvent::Error { message } = events.last().unwrap() else {
        panic!("expected an error event");
    };
    assert!(!message.contains("not valid JSON"));
    assert!(message.contains("an array"));
}

#[tokio::test]
async fn given_chat_completion_provider_when_running_then_two_formatting_events() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::chat(&sample_exam_json())));
    let service = extraction_service(Arc::clone(&factory));
    let (mut progress, rx) = ProgressChannel::bounded(16);

    service
        .run(text_request("1. 2 + 2 = ?"), &mut progress)
        .await
        .unwrap();
    drop(progress);
    let events = drain(rx).await;

    assert_eq!(factory.client().mode(), GenerationMode::ChatCompletion);
    assert_eq!(
        stages(&events),
        vec![
            PipelineStage::Analyzing,
            PipelineStage::Formatting,
            PipelineStage::Formatting,
            PipelineStage::Complete,
        ]
    );
}

#[tokio::test]
async fn given_pasted_text_when_running_then_parsing_skipped_and_low_temperature() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&[
        sample_exam_json().as_str(),
    ])));
    let service = extraction_service(Arc::clone(&factory));
    let (mut progress, rx) = ProgressChannel::bounded(16);

    service
        .run(text_request("一、选择题\n1. 2 + 2 = ?"), &mut progress)
        .await
        .unwrap();
    drop(progress);
    let events = drain(rx).await;

    assert_eq!(events[0].stage(), PipelineStage::Analyzing);
    let request = factory.client().last_request().unwrap();
    assert_eq!(request.temperature, Some(0.3));
    assert!(request.prompt.contains("一、选择题"));
}

#[tokio::test]
async fn given_no_input_when_running_then_no_input_error_event() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&["{}"])));
    let service = extraction_service(Arc::clone(&factory));

    for request in [ExtractionRequest::default(), text_request("   ")] {
        let (mut progress, rx) = ProgressChannel::bounded(4);
        let result = service.run(request, &mut progress).await;
        drop(progress);

        assert!(matches!(result, Err(ExtractionError::NoInput)));
        assert_eq!(stages(&drain(rx).await), vec![PipelineStage::Error]);
    }
    assert_eq!(factory.client().calls(), 0);
}

#[tokio::test]
async fn given_incomplete_openai_fields_when_running_then_configuration_error() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&["{}"])));
    let service = extraction_service(Arc::clone(&factory));
    let mut request = text_request("1. 2 + 2 = ?");
    request.provider = ProviderFields {
        provider: Some("openai".to_string()),
        openai_base_url: Some("http://localhost:1234/v1".to_string()),
        ..ProviderFields::default()
    };

    let mut progress = ProgressChannel::detached();
    let result = service.run(request, &mut progress).await;

    assert!(matches!(
        result,
        Err(ExtractionError::IncompleteConfiguration(
            ProviderSelectionError::Incomplete("openaiApiKey")
        ))
    ));
    assert_eq!(progress.stage(), PipelineStage::Error);
    assert_eq!(factory.client().calls(), 0);
}

#[tokio::test]
async fn given_rate_limited_provider_when_running_then_provider_failure() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::rate_limited()));
    let service = extraction_service(factory);

    let mut progress = ProgressChannel::detached();
    let result = service.run(text_request("1. 2 + 2 = ?"), &mut progress).await;

    assert!(matches!(result, Err(ExtractionError::ProviderCallFailure(_))));
}

#[tokio::test]
async fn given_consumer_gone_when_running_then_run_ends_without_model_call() {
    let factory = Arc::new(StubClientFactory::new(StubLlmClient::streaming(&["{}"])));
    let service = extraction_service(Arc::clone(&factory));
    let (mut progress, rx) = ProgressChannel::bounded(4);
    drop(rx);

    let result = service.run(text_request("1. 2 + 2 = ?"), &mut progress).await;

    assert!(matches!(
        result,
        Err(ExtractionError::Progress(ProgressError::Disconnected))
    ));
    assert_eq!(factory.client().calls(), 0);
}
