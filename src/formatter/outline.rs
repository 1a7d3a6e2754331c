//! Plain-text outline of a newsletter Document, for reviewing the structure in a
//! terminal. Links are shown inline as `text <url>`.

use crate::types::{Document, ParagraphKind, Span};

const INDENT: &str = "  ";

fn render_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        out.push_str(&span.text);
        if let Some(url) = &span.link {
            if url != &span.text {
                out.push_str(&format!(" <{url}>"));
            }
        }
    }
    out
}

pub fn to_outline(doc: &Document) -> String {
    let mut out = String::new();

    for paragraph in &doc.paragraphs {
        let text = render_spans(&paragraph.spans);
        let (first, rest) = match paragraph.kind {
            ParagraphKind::Title => (String::new(), String::new()),
            ParagraphKind::Heading(level) => ("#".repeat(level as usize) + " ", String::new()),
            ParagraphKind::Normal => (String::new(), String::new()),
            ParagraphKind::ListItem { level } => {
                let indent = INDENT.repeat(level as usize);
                (format!("{indent}* "), format!("{indent}  "))
            }
        };

        for (i, line) in text.split('\n').enumerate() {
            let lead = if i == 0 { &first } else { &rest };
            out.push_str(format!("{lead}{line}").trim_end());
            out.push('\n');
        }

        if paragraph.kind == ParagraphKind::Title {
            out.push_str(&"=".repeat(text.chars().count()));
            out.push('\n');
        }
    }

    out
}
