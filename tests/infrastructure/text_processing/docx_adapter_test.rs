use paperforge::application::ports::{FileLoader, FileLoaderError};
use paperforge::domain::{ContentType, SourceDocument};
use paperforge::infrastructure::text_processing::DocxAdapter;

use crate::helpers::{docx_bytes, docx_with_body};

fn docx_document(size: usize) -> SourceDocument {
    SourceDocument::new("paper.docx".to_string(), ContentType::Docx, size as u64)
}

#[tokio::test]
async fn given_docx_with_tab_stops_when_extracting_then_only_paragraph_text_returned() {
    let data = docx_bytes(&["一、选择题", "1. 3 + 4 = ?"]);
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "一、选择题\n1. 3 + 4 = ?");
}

#[tokio::test]
async fn given_escaped_entities_when_extracting_then_decoded() {
    let data = docx_bytes(&["a &lt; b &amp;&amp; c &#x3E; d"]);
    let adapter = DocxAdapter::new();

    let text = adapter
        .extract_text(&data, &docx_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "a < b && c > d");
}

#[tokio::test]
async fn given_docx_table_when_extracting_then_one_line_per_row() {
    let data = docx_with_body(concat!(
        r#"<w:p><w:r><w:t>二、计算题</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr>"#,
        r#"<w:tc><w:p><w:r><w:t>12 + 7 =</w:t></w:r></w:p></w:tc>"#,
        r#"<w:tc><w:p><w:r><w:t>30 - 9 =</w:t></w:r></w:p></w:tc>"#,
        r#"</w:tr></w:tbl>"#,
    ));

    let text = DocxAdapter::new()
        .extract_text(&data, &docx_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "二、计算题\n12 + 7 = 30 - 9 =");
}

#[tokio::test]
async fn given_hyperlink_and_manual_break_when_extracting_then_both_kept() {
    let data = docx_with_body(concat!(
        r#"<w:p><w:r><w:t>参考</w:t></w:r>"#,
        r#"<w:hyperlink w:anchor="lesson3"><w:r><w:t>课本第三页</w:t></w:r></w:hyperlink>"#,
        r#"<w:r><w:br/><w:t>第二行</w:t></w:r></w:p>"#,
    ));

    let text = DocxAdapter::new()
        .extract_text(&data, &docx_document(data.len()))
        .await
        .unwrap();

    assert_eq!(text, "参考课本第三页\n第二行");
}

#[tokio::test]
async fn given_docx_without_text_when_extracting_then_no_text_found() {
    let data = docx_bytes(&["", "   "]);
    let adapter = DocxAdapter::new();

    let result = adapter.extract_text(&data, &docx_document(data.len())).await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(name)) if name == "paper.docx"));
}

#[tokio::test]
async fn given_corrupt_archive_when_extracting_then_extraction_failed() {
    let adapter = DocxAdapter::new();

    let result = adapter
        .extract_text(b"not a zip file", &docx_document(14))
        .await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_pdf_document_when_extracting_with_docx_adapter_then_unsupported() {
    let adapter = DocxAdapter::new();
    let document = SourceDocument::new("paper.pdf".to_string(), ContentType::Pdf, 3);

    let result = adapter.extract_text(b"pdf", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
