use std::fmt;

/// Stages of one extraction run, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Received,
    Parsing,
    Analyzing,
    Formatting,
    Generating,
    Complete,
    Error,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Parsing => "parsing",
            Self::Analyzing => "analyzing",
            Self::Formatting => "formatting",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Stages only move forward. `formatting` and `generating` may repeat
    /// (placeholder updates and one step per fragment); any live stage may
    /// fail.
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        if self.is_terminal() {
            return false;
        }

        match next {
            Self::Error => true,
            Self::Formatting | Self::Generating if next == *self => true,
            _ => next > *self,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
