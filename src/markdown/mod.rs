//! Restricted markdown for chat replies.
//!
//! Supports fenced code blocks, inline code, `###`–`#####` headings,
//! bold/italic, links, flat lists, single-line blockquotes and paragraphs.
//! Text is parsed into a [`Block`] tree first and rendered to markup in a
//! separate pass, so each node kind owns its escaping rule: only fenced
//! code is HTML-escaped, everything else is emitted verbatim.

mod html;
mod inline;
mod parser;

pub use html::{render_blocks, RenderOptions};
pub use parser::parse;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// Level is always 3, 4 or 5.
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    /// Ordered and unordered items alike; numbering is not kept.
    List(Vec<Vec<Inline>>),
    BlockQuote(Vec<Inline>),
    Paragraph(Vec<Inline>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { label: Vec<Inline>, url: String },
}

pub fn render(text: &str) -> String {
    render_with(text, &RenderOptions::default())
}

pub fn render_with(text: &str, options: &RenderOptions) -> String {
    render_blocks(&parse(text), options)
}
