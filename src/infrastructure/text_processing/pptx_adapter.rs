use std::sync::LazyLock;

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, SourceDocument};

use super::ooxml::OoxmlPackage;
use super::slide_tree::SlideTree;
use super::text_sanitizer::sanitize_extracted_text;

static SLIDE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

/// Slide text from a PowerPoint deck, slides in numeric order, speaker notes
/// excluded.
#[derive(Default)]
pub struct PptxAdapter;

impl PptxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract(data: Vec<u8>) -> Result<SlideTree, FileLoaderError> {
        let mut package = OoxmlPackage::open(data)?;

        let mut slides: Vec<(u32, String)> = package
            .entry_names()
            .into_iter()
            .filter_map(|name| {
                let number = SLIDE_PART.captures(&name)?.get(1)?.as_str().parse().ok()?;
                Some((number, name))
            })
            .collect();
        slides.sort_by_key(|(number, _)| *number);

        let mut deck = Vec::with_capacity(slides.len());
        for (number, name) in slides {
            let xml = package.require_part(&name)?;
            let mut children = shapes(&xml, &name)?;

            let rels_name = format!("ppt/slides/_rels/slide{number}.xml.rels");
            let notes_name = match package.read_part(&rels_name)? {
                Some(rels) => notes_target(&rels, &rels_name)?,
                None => None,
            };
            if let Some(notes_name) = notes_name {
                let notes_part = format!("ppt/notesSlides/{notes_name}");
                if let Some(notes_xml) = package.read_part(&notes_part)? {
                    children.push(SlideTree::Note {
                        children: shapes(&notes_xml, &notes_part)?,
                    });
                }
            }

            deck.push(SlideTree::Slide { children });
        }

        Ok(SlideTree::Sequence(deck))
    }
}

fn xml_error(part: &str, e: impl std::fmt::Display) -> FileLoaderError {
    FileLoaderError::ExtractionFailed(format!("malformed XML in {part}: {e}"))
}

/// Text boxes and tables of one slide or notes page, in document order.
fn shapes(xml: &str, part: &str) -> Result<Vec<SlideTree>, FileLoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = ShapeWalker::default();

    loop {
        match reader.read_event().map_err(|e| xml_error(part, e))? {
            Event::Start(e) => walker.open(e.local_name().as_ref()),
            Event::Empty(e) if e.local_name().as_ref() == b"br" => walker.paragraph.push('\n'),
            Event::Text(t) if walker.in_text => {
                let text = t.unescape().map_err(|e| xml_error(part, e))?;
                walker.paragraph.push_str(&text);
            }
            Event::End(e) => walker.close(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(walker.shapes)
}

/// Builds shape containers from DrawingML events. A text box (`p:sp`) holds
/// paragraphs; a table (`p:graphicFrame`) holds one tab-separated line per row.
#[derive(Default)]
struct ShapeWalker {
    shapes: Vec<SlideTree>,
    paragraphs: Vec<SlideTree>,
    rows: Vec<SlideTree>,
    cells: Vec<String>,
    cell: Vec<String>,
    paragraph: String,
    in_text: bool,
    in_cell: bool,
}

impl ShapeWalker {
    fn open(&mut self, name: &[u8]) {
        match name {
            b"sp" => self.paragraphs.clear(),
            b"graphicFrame" => self.rows.clear(),
            b"tr" => self.cells.clear(),
            b"tc" => {
                self.cell.clear();
                self.in_cell = true;
            }
            b"p" => self.paragraph.clear(),
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"p" => {
                let text = std::mem::take(&mut self.paragraph);
                if self.in_cell {
                    self.cell.push(text);
                } else {
                    self.paragraphs.push(SlideTree::Paragraph { text });
                }
            }
            b"tc" => {
                self.in_cell = false;
                let cell = std::mem::take(&mut self.cell);
                self.cells.push(cell.join(" "));
            }
            b"tr" => {
                let cells = std::mem::take(&mut self.cells);
                self.rows.push(SlideTree::Text(cells.join("\t")));
            }
            b"sp" => self.shapes.push(SlideTree::Container {
                text: None,
                children: std::mem::take(&mut self.paragraphs),
            }),
            b"graphicFrame" => self.shapes.push(SlideTree::Container {
                text: None,
                children: std::mem::take(&mut self.rows),
            }),
            _ => {}
        }
    }
}

/// File name of the notes page a slide's relationships point at.
fn notes_target(rels: &str, part: &str) -> Result<Option<String>, FileLoaderError> {
    let mut reader = Reader::from_str(rels);

    loop {
        match reader.read_event().map_err(|e| xml_error(part, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let is_notes = attribute(&e, b"Type", part)?
                    .is_some_and(|kind| kind.ends_with("notesSlide"));
                if !is_notes {
                    continue;
                }
                return Ok(attribute(&e, b"Target", part)?
                    .and_then(|target| target.rsplit('/').next().map(str::to_string)));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn attribute(
    element: &BytesStart<'_>,
    name: &[u8],
    part: &str,
) -> Result<Option<String>, FileLoaderError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(part, e))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|e| xml_error(part, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[async_trait]
impl FileLoader for PptxAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &SourceDocument,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Pptx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let bytes = data.to_vec();
        let deck = tokio::task::spawn_blocking(move || Self::extract(bytes))
            .await
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let slide_count = match &deck {
            SlideTree::Sequence(slides) => slides.len(),
            _ => 1,
        };
        let text = sanitize_extracted_text(&deck.flatten());
        tracing::info!(slide_count, "PPTX text extraction complete");

        if text.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }
        Ok(text)
    }
}
