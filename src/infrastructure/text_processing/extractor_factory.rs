use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::FileLoader;
use crate::domain::ContentType;
use crate::presentation::config::ExtractionSettings;

use super::composite_file_loader::CompositeFileLoader;
use super::docx_adapter::DocxAdapter;
use super::pdf_adapter::PdfAdapter;
use super::pptx_adapter::PptxAdapter;

pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Loader covering every accepted upload format.
    pub fn create(settings: &ExtractionSettings) -> CompositeFileLoader {
        let pdf_timeout = Duration::from_secs(settings.pdf_timeout_secs);
        tracing::info!(
            pdf_timeout_secs = settings.pdf_timeout_secs,
            "Registering PDF, DOCX and PPTX extractors"
        );

        let pdf: Arc<dyn FileLoader> = Arc::new(PdfAdapter::with_timeout(pdf_timeout));
        let docx: Arc<dyn FileLoader> = Arc::new(DocxAdapter::new());
        let pptx: Arc<dyn FileLoader> = Arc::new(PptxAdapter::new());

        CompositeFileLoader::new(vec![
            (ContentType::Pdf, pdf),
            (ContentType::Docx, docx),
            (ContentType::Pptx, pptx),
        ])
    }
}
