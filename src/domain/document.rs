use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

/// An uploaded exam file whose format has already been recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub id: DocumentId,
    pub filename: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
}

impl SourceDocument {
    pub fn new(filename: String, content_type: ContentType, size_bytes: u64) -> Self {
        Self {
            id: DocumentId::new(),
            filename,
            content_type,
            size_bytes,
        }
    }
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const PPT_MIME: &str = "application/vnd.ms-powerpoint";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
    Docx,
    Pptx,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentTypeError {
    #[error("unsupported file type: {0}. Please upload a PDF, DOCX or PPTX file")]
    Unsupported(String),
    #[error("legacy .ppt files are not supported. Please save the presentation as .pptx and upload it again")]
    LegacyPowerPoint,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            PPTX_MIME => Some(Self::Pptx),
            _ => None,
        }
    }

    pub fn from_extension(filename: &str) -> Option<Self> {
        match extension_of(filename)?.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Resolves the declared MIME type first and falls back to the file
    /// extension, since browsers often send `application/octet-stream` for
    /// Office files.
    pub fn detect(mime: Option<&str>, filename: &str) -> Result<Self, ContentTypeError> {
        if let Some(content_type) = mime.and_then(Self::from_mime) {
            return Ok(content_type);
        }

        let declared_ppt = mime.is_some_and(|m| m.trim().eq_ignore_ascii_case(PPT_MIME));
        if declared_ppt || extension_of(filename).as_deref() == Some("ppt") {
            return Err(ContentTypeError::LegacyPowerPoint);
        }

        Self::from_extension(filename).ok_or_else(|| {
            ContentTypeError::Unsupported(
                mime.filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| filename.to_string()),
            )
        })
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => DOCX_MIME,
            Self::Pptx => PPTX_MIME,
        }
    }
}

fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
