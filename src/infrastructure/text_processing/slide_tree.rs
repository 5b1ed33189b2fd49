/// Text content of a presentation, shaped like the deck itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideTree {
    Text(String),
    Sequence(Vec<SlideTree>),
    Slide { children: Vec<SlideTree> },
    /// Speaker notes. Never part of the extracted text.
    Note { children: Vec<SlideTree> },
    Paragraph { text: String },
    Container {
        text: Option<String>,
        children: Vec<SlideTree>,
    },
}

impl SlideTree {
    /// Visible text in document order, one contribution per line.
    pub fn flatten(&self) -> String {
        let mut parts = Vec::new();
        self.collect(&mut parts);
        parts.join("\n")
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Text(text) | Self::Paragraph { text } => push_non_empty(text, out),
            Self::Note { .. } => {}
            Self::Sequence(children) | Self::Slide { children } => {
                for child in children {
                    child.collect(out);
                }
            }
            Self::Container { text, children } => {
                if let Some(text) = text {
                    push_non_empty(text, out);
                }
                for child in children {
                    child.collect(out);
                }
            }
        }
    }
}

fn push_non_empty<'a>(text: &'a str, out: &mut Vec<&'a str>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
}
