mod composite_file_loader;
mod docx_adapter;
mod extractor_factory;
mod ooxml;
mod pdf_adapter;
mod pptx_adapter;
mod slide_tree;
mod text_sanitizer;

pub use composite_file_loader::CompositeFileLoader;
pub use docx_adapter::DocxAdapter;
pub use extractor_factory::ExtractorFactory;
pub use ooxml::OoxmlPackage;
pub use pdf_adapter::PdfAdapter;
pub use pptx_adapter::PptxAdapter;
pub use slide_tree::SlideTree;
pub use text_sanitizer::sanitize_extracted_text;
