//! Plain-text views of editor markup.
//!
//! Stored content is never rendered as markup. Anything shown to the user goes
//! through [`to_plain_text`], which drops tags (and the bodies of `script` and
//! `style`) and control characters, so stored markup cannot reach the terminal
//! as escape sequences.

const BLOCK_TAGS: [&str; 14] = [
    "p", "div", "br", "li", "ol", "ul", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6",
];

const SKIPPED_TAGS: [&str; 2] = ["script", "style"];

/// Strips markup down to its visible text. Block elements become line breaks,
/// images and embedded videos become `[image]` / `[video]` placeholders.
#[must_use]
pub fn to_plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut skipping: Option<String> = None;
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        let (text, tail) = rest.split_at(lt);
        if skipping.is_none() {
            out.push_str(&decode_entities(text));
        }

        let Some(gt) = tag_end(tail) else {
            // Unterminated tag, keep it as text
            if skipping.is_none() {
                out.push_str(&decode_entities(tail));
            }
            rest = "";
            break;
        };

        let tag = &tail[1..gt];
        let closing = tag.starts_with('/');
        let name = tag_name(tag);
        rest = &tail[gt + 1..];

        if let Some(end) = &skipping {
            if closing && name == *end {
                skipping = None;
            }
            continue;
        }

        if !closing && SKIPPED_TAGS.contains(&name.as_str()) {
            skipping = Some(name);
        } else if BLOCK_TAGS.contains(&name.as_str()) {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
        } else if name == "img" {
            out.push_str("[image]");
        } else if name == "iframe" && !closing {
            out.push_str("[video]");
        }
    }

    if skipping.is_none() {
        out.push_str(&decode_entities(rest));
    }
    strip_controls(&out).trim().to_string()
}

/// Drops control characters other than line breaks and tabs (ESC, BEL, ...)
#[must_use]
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// Wraps typed lines the way the editor stores them: one paragraph per line,
/// with `<`, `>` and `&` escaped.
#[must_use]
pub fn from_plain_text(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", escape(line))
            }
        })
        .collect()
}

/// True when the markup has nothing visible, e.g. Quill's empty `<p><br></p>`
#[must_use]
pub fn is_blank(markup: &str) -> bool {
    to_plain_text(markup).trim().is_empty()
}

/// Shortened plain-text excerpt: at most `max_lines` non-empty lines, each cut to
/// `width` characters. Cut text ends with an ellipsis.
#[must_use]
pub fn preview(markup: &str, max_lines: usize, width: usize) -> String {
    let text = to_plain_text(markup);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut shown: Vec<String> = lines
        .iter()
        .take(max_lines)
        .map(|l| truncate(l, width))
        .collect();
    if lines.len() > max_lines {
        if let Some(last) = shown.last_mut() {
            if !last.ends_with('…') {
                last.push('…');
            }
        }
    }
    shown.join("\n")
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

// Index of the `>` closing the tag at the start of `tail`, ignoring any inside quoted values
fn tag_end(tail: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tail.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn decode_entities(text: &str) -> String {
    // &amp; last, so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
