use super::Inline;

/// Inline spans, in precedence order: code spans, links, bold, italic.
/// Code span content is taken literally; link labels get emphasis.
pub fn parse(text: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while let Some(offset) = text[i..].find('`') {
        let open = i + offset;
        match text[open + 1..].find('`') {
            // "``" is not a span; the first backtick stays literal.
            Some(0) => i = open + 1,
            Some(len) => {
                let close = open + 1 + len;
                parse_links(&text[plain_start..open], &mut nodes);
                nodes.push(Inline::Code(text[open + 1..close].to_string()));
                i = close + 1;
                plain_start = i;
            }
            None => break,
        }
    }
    parse_links(&text[plain_start..], &mut nodes);

    nodes
}

fn parse_links(text: &str, out: &mut Vec<Inline>) {
    let mut plain_start = 0;
    let mut i = 0;

    while let Some(offset) = text[i..].find('[') {
        let open = i + offset;
        match match_link(&text[open..]) {
            Some((label, url, len)) => {
                parse_emphasis(&text[plain_start..open], out);
                let mut label_nodes = Vec::new();
                parse_emphasis(label, &mut label_nodes);
                out.push(Inline::Link {
                    label: label_nodes,
                    url: url.to_string(),
                });
                i = open + len;
                plain_start = i;
            }
            None => i = open + 1,
        }
    }
    parse_emphasis(&text[plain_start..], out);
}

/// `[label](url)` at the start of `s`; returns label, url and the byte
/// length of the whole link. Label and url must be non-empty.
fn match_link(s: &str) -> Option<(&str, &str, usize)> {
    let close = 1 + s[1..].find(']')?;
    if close == 1 {
        return None;
    }
    let url_body = s[close + 1..].strip_prefix('(')?;
    let url_len = url_body.find(')')?;
    if url_len == 0 {
        return None;
    }
    Some((&s[1..close], &url_body[..url_len], close + 3 + url_len))
}

fn parse_emphasis(text: &str, out: &mut Vec<Inline>) {
    let mut plain_start = 0;
    let mut i = 0;

    while let Some(offset) = text[i..].find("**") {
        let open = i + offset;
        let body = open + 2;
        match find_on_line(&text[body..], "**") {
            Some(len) => {
                parse_italic(&text[plain_start..open], out);
                let mut inner = Vec::new();
                parse_italic(&text[body..body + len], &mut inner);
                out.push(Inline::Strong(inner));
                i = body + len + 2;
                plain_start = i;
            }
            None => i = open + 1,
        }
    }
    parse_italic(&text[plain_start..], out);
}

fn parse_italic(text: &str, out: &mut Vec<Inline>) {
    let mut plain_start = 0;
    let mut i = 0;

    while let Some(offset) = text[i..].find('*') {
        let open = i + offset;
        match find_on_line(&text[open + 1..], "*") {
            Some(len) => {
                push_text(&text[plain_start..open], out);
                let mut inner = Vec::new();
                push_text(&text[open + 1..open + 1 + len], &mut inner);
                out.push(Inline::Emphasis(inner));
                i = open + len + 2;
                plain_start = i;
            }
            None => i = open + 1,
        }
    }
    push_text(&text[plain_start..], out);
}

/// Closing delimiter search that stops at the end of the current line.
fn find_on_line(s: &str, delimiter: &str) -> Option<usize> {
    let line_end = s.find('\n').unwrap_or(s.len());
    s[..line_end].find(delimiter)
}

fn push_text(s: &str, out: &mut Vec<Inline>) {
    if s.is_empty() {
        return;
    }
    if let Some(Inline::Text(prev)) = out.last_mut() {
        prev.push_str(s);
    } else {
        out.push(Inline::Text(s.to_string()));
    }
}
