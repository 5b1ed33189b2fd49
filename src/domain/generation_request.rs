use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "基础",
            Self::Medium => "中等",
            Self::Hard => "困难",
        }
    }
}

/// Request for a full exam generated from a topic description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRequest {
    /// School level, e.g. 小学 / 初中 / 高中.
    pub level: String,
    pub grade_spec: String,
    pub subject: String,
    pub topic_description: String,
    pub difficulty: Difficulty,
}

/// Request for a single-section drill on one question type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRequest {
    pub level: String,
    pub grade_spec: String,
    pub subject: String,
    /// A question type value, or the UI-only `geometry` / `application` kinds.
    pub question_type: String,
    pub topic_description: String,
    pub count: u32,
}

impl PracticeRequest {
    pub fn is_geometry(&self) -> bool {
        self.question_type == "geometry"
    }

    /// Kinds where an illustration may help but is not mandatory.
    pub fn allows_illustrations(&self) -> bool {
        matches!(
            self.question_type.as_str(),
            "calculation" | "application" | "short_answer"
        )
    }
}

/// Request to rewrite a teacher's rough topic notes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub raw_input: String,
    pub grade: String,
    pub subject: String,
}
