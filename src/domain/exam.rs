use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::blank_normalizer::normalize_blanks;
use super::lenient;

/// Structured exam produced by the extraction and generation pipelines.
///
/// Field names follow the camelCase JSON contract shared with the model's
/// response schema and with rendering clients. Decoding is forgiving: any
/// JSON object becomes a document, and consistency is only reported by
/// [`ExamDocument::inspect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subject: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Question-type label without the "一、" style numbering prefix.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_score: u32,
    #[serde(default, deserialize_with = "lenient::list")]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, deserialize_with = "lenient::count")]
    pub id: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub number: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "question_type")]
    pub question_type: QuestionType,
    #[serde(default, deserialize_with = "lenient::count")]
    pub score: u32,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub options: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub answer_space_lines: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_diagram: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_prompt: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

fn question_type<'de, D>(deserializer: D) -> Result<QuestionType, D::Error>
where
    D: Deserializer<'de>,
{
    lenient::text(deserializer).map(QuestionType::from)
}

/// Question category. Labels outside the known set are kept verbatim in
/// `Other` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum QuestionType {
    MultipleChoice,
    FillInBlank,
    ShortAnswer,
    Calculation,
    Essay,
    Judgment,
    Other(String),
}

impl QuestionType {
    pub const KNOWN: [QuestionType; 6] = [
        Self::MultipleChoice,
        Self::FillInBlank,
        Self::ShortAnswer,
        Self::Calculation,
        Self::Essay,
        Self::Judgment,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::FillInBlank => "fill_in_blank",
            Self::ShortAnswer => "short_answer",
            Self::Calculation => "calculation",
            Self::Essay => "essay",
            Self::Judgment => "judgment",
            Self::Other(label) => label,
        }
    }

    /// Choice and judgment questions are answered inline and never get
    /// answer lines.
    pub fn answered_inline(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Judgment)
    }
}

impl Default for QuestionType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for QuestionType {
    fn from(label: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(label.trim()))
            .unwrap_or(Self::Other(label))
    }
}

impl From<QuestionType> for String {
    fn from(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A soft inconsistency in a model-produced exam. Reported, never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelIssue {
    SectionScoreMismatch {
        section: String,
        declared: u32,
        actual: u32,
    },
    ExamScoreMismatch {
        declared: u32,
        actual: u32,
    },
    DuplicateQuestionId(u32),
    DuplicateQuestionNumber(u32),
    MissingOptions {
        question_id: u32,
    },
    UnexpectedOptions {
        question_id: u32,
        question_type: QuestionType,
    },
    UnexpectedAnswerSpace {
        question_id: u32,
        question_type: QuestionType,
    },
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionScoreMismatch {
                section,
                declared,
                actual,
            } => write!(
                f,
                "section '{}' declares {} points but its questions sum to {}",
                section, declared, actual
            ),
            Self::ExamScoreMismatch { declared, actual } => write!(
                f,
                "exam declares {} points but its sections sum to {}",
                declared, actual
            ),
            Self::DuplicateQuestionId(id) => write!(f, "question id {} appears more than once", id),
            Self::DuplicateQuestionNumber(number) => {
                write!(f, "question number {} appears more than once", number)
            }
            Self::MissingOptions { question_id } => {
                write!(f, "multiple choice question {} has no options", question_id)
            }
            Self::UnexpectedOptions {
                question_id,
                question_type,
            } => write!(
                f,
                "{} question {} carries options",
                question_type, question_id
            ),
            Self::UnexpectedAnswerSpace {
                question_id,
                question_type,
            } => write!(
                f,
                "{} question {} reserves answer lines",
                question_type, question_id
            ),
        }
    }
}

impl ExamDocument {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Gives questions without an id or number (zero after decoding) their
    /// 1-based position in the document.
    pub fn fill_missing_numbers(&mut self) {
        for (position, question) in self
            .sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .enumerate()
        {
            let position = u32::try_from(position + 1).unwrap_or(u32::MAX);
            if question.id == 0 {
                question.id = position;
            }
            if question.number == 0 {
                question.number = position;
            }
        }
    }

    pub fn normalize_blanks(&mut self) {
        for question in self
            .sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .filter(|q| q.question_type == QuestionType::FillInBlank)
        {
            question.text = normalize_blanks(&question.text);
        }
    }

    pub fn inspect(&self) -> Vec<ModelIssue> {
        let mut issues = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_numbers = HashSet::new();

        for section in &self.sections {
            let actual = section.score_sum();
            if actual != section.total_score {
                issues.push(ModelIssue::SectionScoreMismatch {
                    section: section.title.clone(),
                    declared: section.total_score,
                    actual,
                });
            }

            for question in &section.questions {
                if !seen_ids.insert(question.id) {
                    issues.push(ModelIssue::DuplicateQuestionId(question.id));
                }
                if !seen_numbers.insert(question.number) {
                    issues.push(ModelIssue::DuplicateQuestionNumber(question.number));
                }
                issues.extend(question.inspect());
            }
        }

        if let Some(declared) = self.total_score {
            let actual: u32 = self.sections.iter().map(|s| s.total_score).sum();
            if actual != declared {
                issues.push(ModelIssue::ExamScoreMismatch { declared, actual });
            }
        }

        issues
    }
}

impl Section {
    pub fn score_sum(&self) -> u32 {
        self.questions.iter().map(|q| q.score).sum()
    }
}

impl Question {
    fn inspect(&self) -> Option<ModelIssue> {
        let has_options = self.options.as_ref().is_some_and(|o| !o.is_empty());

        match &self.question_type {
            QuestionType::MultipleChoice if !has_options => {
                return Some(ModelIssue::MissingOptions {
                    question_id: self.id,
                });
            }
            QuestionType::MultipleChoice => {}
            question_type if has_options => {
                return Some(ModelIssue::UnexpectedOptions {
                    question_id: self.id,
                    question_type: question_type.clone(),
                });
            }
            _ => {}
        }

        if self.question_type.answered_inline() && self.answer_space_lines.unwrap_or(0) > 0 {
            return Some(ModelIssue::UnexpectedAnswerSpace {
                question_id: self.id,
                question_type: self.question_type.clone(),
            });
        }

        None
    }
}
