//! Minimal tag/class HTML querying over rendered markup.
//!
//! Deliberately naive string scanning tailored to listing pages: no full DOM,
//! no CSS engine. Tag and attribute names are matched ASCII-case-insensitively;
//! class names are compared exactly. Nested same-name tags are handled by
//! depth counting, so a card `<div>` containing inner `<div>`s is extracted
//! whole.

/// Inner HTML of every `tag` element whose class list contains `class`.
///
/// Matched elements are not searched again for nested matches.
pub fn elements_by_class<'a>(html: &'a str, tag: &str, class: &str) -> Vec<&'a str> {
    let lower = ascii_lower(html);
    let tag = tag.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut at = 0;

    while let Some((start, open_end)) = find_open_tag(&lower, &tag, at) {
        if class_list_contains(html, &lower, start, open_end, class) {
            if let Some(inner_end) = balanced_inner_end(&lower, &tag, open_end) {
                out.push(&html[open_end..inner_end]);
                at = inner_end;
                continue;
            }
        }
        at = open_end;
    }
    out
}

/// Inner HTML of the first `tag` element whose class list contains `class`
pub fn first_by_class<'a>(html: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let lower = ascii_lower(html);
    let tag = tag.to_ascii_lowercase();
    let mut at = 0;

    while let Some((start, open_end)) = find_open_tag(&lower, &tag, at) {
        if class_list_contains(html, &lower, start, open_end, class) {
            if let Some(inner_end) = balanced_inner_end(&lower, &tag, open_end) {
                return Some(&html[open_end..inner_end]);
            }
        }
        at = open_end;
    }
    None
}

/// Inner HTML of the first `tag` element with the exact `id`
pub fn element_by_id<'a>(html: &'a str, tag: &str, id: &str) -> Option<&'a str> {
    let lower = ascii_lower(html);
    let tag = tag.to_ascii_lowercase();
    let mut at = 0;

    while let Some((start, open_end)) = find_open_tag(&lower, &tag, at) {
        if attr_value(html, &lower, start, open_end, "id") == Some(id) {
            if let Some(inner_end) = balanced_inner_end(&lower, &tag, open_end) {
                return Some(&html[open_end..inner_end]);
            }
        }
        at = open_end;
    }
    None
}

/// Value of `attr` on the first `tag` element whose class list contains `class`
pub fn first_attr(html: &str, tag: &str, class: &str, attr: &str) -> Option<String> {
    let lower = ascii_lower(html);
    let tag = tag.to_ascii_lowercase();
    let mut at = 0;

    while let Some((start, open_end)) = find_open_tag(&lower, &tag, at) {
        if class_list_contains(html, &lower, start, open_end, class) {
            return attr_value(html, &lower, start, open_end, attr).map(str::to_string);
        }
        at = open_end;
    }
    None
}

/// Visible text of an HTML fragment: tags stripped, common entities decoded,
/// whitespace collapsed and trimmed.
pub fn inner_text(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&stripped))
}

/// Decode the handful of entities listing pages actually use
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Collapse whitespace runs into single spaces and trim
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// ASCII-only lowercasing; byte length is preserved so indices into the
/// lowered copy are valid in the original
fn ascii_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Find the next `<tag ...>` opening from `from`, returning
/// `(tag_start, open_end)` where `open_end` is just past the `>`.
fn find_open_tag(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let pat = format!("<{tag}");
    let mut at = from;

    while let Some(rel) = lower.get(at..)?.find(&pat) {
        let start = at + rel;
        let after = start + pat.len();
        // Tag-name boundary: "<div" must not match "<dive"
        let boundary = matches!(
            lower.as_bytes().get(after),
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/')
        );
        if boundary {
            let gt = lower[after..].find('>')? + after;
            return Some((start, gt + 1));
        }
        at = start + 1;
    }
    None
}

/// Find the next `</tag>` closing from `from`, returning its start index
fn find_close_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("</{tag}");
    let mut at = from;

    while let Some(rel) = lower.get(at..)?.find(&pat) {
        let start = at + rel;
        let after = start + pat.len();
        let boundary = matches!(
            lower.as_bytes().get(after),
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
        );
        if boundary {
            return Some(start);
        }
        at = start + 1;
    }
    None
}

/// End of the inner HTML of an element opened just before `open_end`,
/// accounting for nested same-name tags
fn balanced_inner_end(lower: &str, tag: &str, open_end: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut at = open_end;

    loop {
        let close = find_close_tag(lower, tag, at)?;
        match find_open_tag(lower, tag, at) {
            Some((open_start, nested_open_end)) if open_start < close => {
                depth += 1;
                at = nested_open_end;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(close);
                }
                at = close + tag.len() + 2;
            }
        }
    }
}

/// Whether the element's class attribute, split on whitespace, contains `class`
fn class_list_contains(
    html: &str,
    lower: &str,
    open_start: usize,
    open_end: usize,
    class: &str,
) -> bool {
    attr_value(html, lower, open_start, open_end, "class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Value of `name` inside an opening tag spanning `open_start..open_end`.
///
/// Handles double-quoted, single-quoted and unquoted attribute values.
fn attr_value<'a>(
    html: &'a str,
    lower: &str,
    open_start: usize,
    open_end: usize,
    name: &str,
) -> Option<&'a str> {
    let attrs = &lower[open_start..open_end];
    let pat = format!("{}=", name.to_ascii_lowercase());
    let mut at = 0;

    while let Some(rel) = attrs.get(at..)?.find(&pat) {
        let idx = at + rel;
        let preceded_by_space = idx > 0 && attrs.as_bytes()[idx - 1].is_ascii_whitespace();
        if !preceded_by_space {
            at = idx + pat.len();
            continue;
        }

        let val_start = idx + pat.len();
        return match attrs.as_bytes().get(val_start) {
            Some(&q @ (b'"' | b'\'')) => {
                let vs = val_start + 1;
                let end = attrs[vs..].find(q as char)? + vs;
                Some(&html[open_start + vs..open_start + end])
            }
            _ => {
                let end = attrs[val_start..]
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .map(|r| val_start + r)
                    .unwrap_or(attrs.len());
                Some(&html[open_start + val_start..open_start + end])
            }
        };
    }
    None
}
