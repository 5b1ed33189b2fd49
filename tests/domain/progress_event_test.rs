use paperforge::domain::{PipelineStage, ProgressEvent};

use crate::helpers::sample_exam;

#[test]
fn given_generating_event_when_serializing_then_status_tag_and_chunk() {
    let json = serde_json::to_string(&ProgressEvent::generating("{\"ti")).unwrap();

    assert_eq!(json, r#"{"status":"generating","chunk":"{\"ti"}"#);
}

#[test]
fn given_complete_event_when_serializing_then_data_carries_document() {
    let event = ProgressEvent::Complete {
        data: sample_exam(),
    };
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["status"], "complete");
    assert_eq!(value["data"]["title"], "三年级数学期中测试");
    assert!(event.is_terminal());
}

#[test]
fn given_error_line_when_decoding_then_error_event() {
    let event: ProgressEvent =
        serde_json::from_str(r#"{"status":"error","message":"boom"}"#).unwrap();

    assert_eq!(event, ProgressEvent::error("boom"));
    assert_eq!(event.stage(), PipelineStage::Error);
}
