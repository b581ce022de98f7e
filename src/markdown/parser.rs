use super::{inline, Block, Inline};

/// Split `text` into blocks. Fenced code is cut out first so that blank
/// lines inside a fence never end a paragraph; the prose between fences
/// is then classified line by line.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(fence) = find_fence(rest) {
        parse_prose(&rest[..fence.start], &mut blocks);
        blocks.push(Block::CodeBlock {
            language: (!fence.language.is_empty()).then(|| fence.language.to_string()),
            code: fence.code.trim().to_string(),
        });
        rest = &rest[fence.end..];
    }
    parse_prose(rest, &mut blocks);

    blocks
}

struct Fence<'a> {
    start: usize,
    end: usize,
    language: &'a str,
    code: &'a str,
}

/// First ```` ```lang\n ... ``` ```` in `text`. The opener does not need
/// to sit at the start of a line.
fn find_fence(text: &str) -> Option<Fence<'_>> {
    let mut from = 0;
    while let Some(offset) = text[from..].find("```") {
        let start = from + offset;
        let lang_start = start + 3;
        let lang_len = text[lang_start..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(text.len() - lang_start);
        let newline = lang_start + lang_len;

        if text[newline..].starts_with('\n') {
            let body = newline + 1;
            // No closer anywhere after this opener means no closer for any
            // later opener either.
            let close = body + text[body..].find("```")?;
            return Some(Fence {
                start,
                end: close + 3,
                language: &text[lang_start..newline],
                code: &text[body..close],
            });
        }
        from = start + 1;
    }
    None
}

enum LineKind<'a> {
    Heading(u8, &'a str),
    Item(&'a str),
    Quote(&'a str),
    Text,
}

fn classify(line: &str) -> LineKind<'_> {
    for (level, marker) in [(5, "##### "), (4, "#### "), (3, "### ")] {
        if let Some(content) = line.strip_prefix(marker) {
            return LineKind::Heading(level, content);
        }
    }

    let trimmed = line.trim_start();
    if let Some(content) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| ordered_item(trimmed))
    {
        return LineKind::Item(content);
    }

    if let Some(content) = line.strip_prefix("> ") {
        return LineKind::Quote(content);
    }

    LineKind::Text
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn parse_prose(text: &str, blocks: &mut Vec<Block>) {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut items: Vec<Vec<Inline>> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_list(&mut items, blocks);
            flush_paragraph(&mut paragraph, blocks);
            continue;
        }

        match classify(line) {
            LineKind::Heading(level, content) => {
                flush_list(&mut items, blocks);
                flush_paragraph(&mut paragraph, blocks);
                blocks.push(Block::Heading {
                    level,
                    content: inline::parse(content),
                });
            }
            LineKind::Item(content) => {
                flush_paragraph(&mut paragraph, blocks);
                items.push(inline::parse(content));
            }
            LineKind::Quote(content) => {
                flush_list(&mut items, blocks);
                flush_paragraph(&mut paragraph, blocks);
                blocks.push(Block::BlockQuote(inline::parse(content)));
            }
            LineKind::Text => {
                flush_list(&mut items, blocks);
                paragraph.push(line);
            }
        }
    }

    flush_list(&mut items, blocks);
    flush_paragraph(&mut paragraph, blocks);
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n");
    lines.clear();
    if !text.trim().is_empty() {
        blocks.push(Block::Paragraph(inline::parse(&text)));
    }
}

fn flush_list(items: &mut Vec<Vec<Inline>>, blocks: &mut Vec<Block>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}
