use serde::{Deserialize, Serialize};

use super::exam::ExamDocument;
use super::pipeline_stage::PipelineStage;

/// One record on the progress channel. Serialized as
/// `{"status": "<stage>", ...}`, one object per ndjson line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProgressEvent {
    Parsing { message: String },
    Analyzing { message: String },
    Formatting { message: String },
    Generating { chunk: String },
    Complete { data: ExamDocument },
    Error { message: String },
}

impl ProgressEvent {
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
        }
    }

    pub fn analyzing(message: impl Into<String>) -> Self {
        Self::Analyzing {
            message: message.into(),
        }
    }

    pub fn formatting(message: impl Into<String>) -> Self {
        Self::Formatting {
            message: message.into(),
        }
    }

    pub fn generating(chunk: impl Into<String>) -> Self {
        Self::Generating {
            chunk: chunk.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Parsing { .. } => PipelineStage::Parsing,
            Self::Analyzing { .. } => PipelineStage::Analyzing,
            Self::Formatting { .. } => PipelineStage::Formatting,
            Self::Generating { .. } => PipelineStage::Generating,
            Self::Complete { .. } => PipelineStage::Complete,
            Self::Error { .. } => PipelineStage::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage().is_terminal()
    }
}
