use super::{Block, Inline};
use crate::utils::escape_html;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderOptions {
    /// Append a `copy-code-button` inside every `<pre>`.
    pub copy_buttons: bool,
}

pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(block, options, &mut out);
    }
    out
}

fn render_block(block: &Block, options: &RenderOptions, out: &mut String) {
    match block {
        Block::CodeBlock { language, code } => {
            match language {
                Some(lang) => {
                    out.push_str("<pre data-language=\"");
                    out.push_str(lang);
                    out.push_str("\">");
                }
                None => out.push_str("<pre>"),
            }
            out.push_str("<code>");
            out.push_str(&escape_html(code));
            out.push_str("</code>");
            if options.copy_buttons {
                out.push_str("<button class=\"copy-code-button\">Copy</button>");
            }
            out.push_str("</pre>");
        }
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{}>", level));
            render_inlines(content, out);
            out.push_str(&format!("</h{}>", level));
        }
        Block::List(items) => {
            out.push_str("<ul>");
            for item in items {
                out.push_str("<li>");
                render_inlines(item, out);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        Block::BlockQuote(content) => {
            out.push_str("<blockquote>");
            render_inlines(content, out);
            out.push_str("</blockquote>");
        }
        Block::Paragraph(content) => {
            out.push_str("<p>");
            render_inlines(content, out);
            out.push_str("</p>");
        }
    }
}

// Prose, inline code and links are written as-is.
fn render_inlines(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(code);
                out.push_str("</code>");
            }
            Inline::Strong(inner) => {
                out.push_str("<strong>");
                render_inlines(inner, out);
                out.push_str("</strong>");
            }
            Inline::Emphasis(inner) => {
                out.push_str("<em>");
                render_inlines(inner, out);
                out.push_str("</em>");
            }
            Inline::Link { label, url } => {
                out.push_str("<a href=\"");
                out.push_str(url);
                out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                render_inlines(label, out);
                out.push_str("</a>");
            }
        }
    }
}
