use serde_json::{Map, Value, json};

use crate::domain::QuestionType;

/// Which optional illustration field the model is offered on each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Plain structure, used when formatting existing material.
    Formatting,
    /// Adds `textDiagram` for ASCII figures in generated exams.
    TextDiagram,
    /// Adds `imagePrompt`, later turned into a generated picture.
    Practice,
}

/// Response schema in the provider's OpenAPI subset (upper-case type names).
pub fn exam_schema(variant: SchemaVariant) -> Value {
    let question_types: Vec<String> = QuestionType::KNOWN.into_iter().map(String::from).collect();

    let mut question = json!({
        "id": { "type": "INTEGER" },
        "number": { "type": "INTEGER" },
        "text": { "type": "STRING" },
        "type": { "type": "STRING", "enum": question_types },
        "score": { "type": "INTEGER" },
        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
        "answerSpaceLines": { "type": "INTEGER" }
    });

    if let Some(properties) = question.as_object_mut() {
        extend_question(properties, variant);
    }

    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "subtitle": { "type": "STRING" },
            "subject": { "type": "STRING" },
            "grade": { "type": "STRING" },
            "durationMinutes": { "type": "INTEGER" },
            "totalScore": { "type": "INTEGER" },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "totalScore": { "type": "INTEGER" },
                        "questions": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": question,
                                "required": ["id", "number", "text", "type", "score"]
                            }
                        }
                    },
                    "required": ["title", "questions", "totalScore"]
                }
            }
        },
        "required": ["title", "subject", "sections"]
    })
}

fn extend_question(properties: &mut Map<String, Value>, variant: SchemaVariant) {
    match variant {
        SchemaVariant::Formatting => {}
        SchemaVariant::TextDiagram => {
            properties.insert(
                "textDiagram".to_string(),
                json!({
                    "type": "STRING",
                    "description": "ASCII art or text-based sketch of a geometry or physics figure."
                }),
            );
        }
        SchemaVariant::Practice => {
            properties.insert(
                "imagePrompt".to_string(),
                json!({
                    "type": "STRING",
                    "description": "Visual description for geometry or physics figures. Empty for text-only questions."
                }),
            );
        }
    }
}
