//! In-memory newsletter document: a flat list of paragraphs, each a run of
//! optionally linked text spans. List nesting is a per-paragraph level.

/// Kind of paragraph, mirroring the document structure the newsletter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Title,
    Heading(u8),
    Normal,
    ListItem { level: u8 },
}

/// A run of text, optionally hyperlinked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub spans: Vec<Span>,
}

impl Paragraph {
    pub fn new(kind: ParagraphKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    /// Append unlinked text.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.spans.push(Span {
            text: text.into(),
            link: None,
        });
        self
    }

    /// Append text linked to `url`.
    pub fn link(&mut self, text: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.spans.push(Span {
            text: text.into(),
            link: Some(url.into()),
        });
        self
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph and return it for filling in.
    pub fn push(&mut self, kind: ParagraphKind) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new(kind));
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }
}
