use std::io::{Cursor, Write};

use paperforge::domain::ExamDocument;
use zip::ZipWriter;
use zip::write::FileOptions;

fn zip_parts(parts: &[(String, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name.as_str(), FileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

const DOCX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const DOCX_PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCX_DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

/// Word package around a raw `w:body` fragment.
pub fn docx_with_body(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
        body
    );
    zip_parts(&[
        ("[Content_Types].xml".to_string(), DOCX_CONTENT_TYPES.to_string()),
        ("_rels/.rels".to_string(), DOCX_PACKAGE_RELS.to_string()),
        ("word/document.xml".to_string(), document),
        (
            "word/_rels/document.xml.rels".to_string(),
            DOCX_DOCUMENT_RELS.to_string(),
        ),
    ])
}

/// Minimal Word package; each entry becomes one paragraph.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            format!(
                r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="420"/></w:tabs></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                p
            )
        })
        .collect();
    docx_with_body(&body)
}

pub struct SlideFixture<'a> {
    pub number: u32,
    pub paragraphs: &'a [&'a str],
    pub notes: Option<&'a str>,
}

fn shape(paragraphs: &[&str]) -> String {
    let paras: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:rPr lang=\"zh-CN\"/><a:t>{}</a:t></a:r></a:p>", p))
        .collect();
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Text\"/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>",
        paras
    )
}

/// Minimal PowerPoint package. Slides are written in the given order, so a
/// fixture can store them out of numeric order.
pub fn pptx_bytes(slides: &[SlideFixture<'_>]) -> Vec<u8> {
    let mut parts = Vec::new();
    for slide in slides {
        parts.push((
            format!("ppt/slides/slide{}.xml", slide.number),
            format!(
                r#"<?xml version="1.0"?><p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
                shape(slide.paragraphs)
            ),
        ));
        if let Some(notes) = slide.notes {
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", slide.number),
                format!(
                    r#"<?xml version="1.0"?><Relationships><Relationship Id="rId2" Type="notesSlide" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                    slide.number
                ),
            ));
            parts.push((
                format!("ppt/notesSlides/notesSlide{}.xml", slide.number),
                format!(
                    r#"<?xml version="1.0"?><p:notes xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:notes>"#,
                    shape(&[notes])
                ),
            ));
        }
    }
    zip_parts(&parts)
}

/// Single-slide deck around a raw `p:spTree` fragment.
pub fn pptx_with_shapes(shapes: &str) -> Vec<u8> {
    zip_parts(&[(
        "ppt/slides/slide1.xml".to_string(),
        format!(
            r#"<?xml version="1.0"?><p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            shapes
        ),
    )])
}

pub fn sample_exam_json() -> String {
    serde_json::json!({
        "title": "三年级数学期中测试",
        "subject": "数学",
        "grade": "三年级",
        "durationMinutes": 60,
        "totalScore": 10,
        "sections": [
            {
                "title": "选择题",
                "totalScore": 4,
                "questions": [
                    {
                        "id": 1,
                        "number": 1,
                        "text": "What is 2+2?",
                        "type": "multiple_choice",
                        "score": 4,
                        "options": ["A. 3", "B. 4", "C. 5"]
                    }
                ]
            },
            {
                "title": "填空题",
                "totalScore": 6,
                "questions": [
                    {
                        "id": 2,
                        "number": 2,
                        "text": "3 + 5 = ( )",
                        "type": "fill_in_blank",
                        "score": 6,
                        "answerSpaceLines": 0
                    }
                ]
            }
        ]
    })
    .to_string()
}

pub fn sample_exam() -> ExamDocument {
    serde_json::from_str(&sample_exam_json()).unwrap()
}
