// Rewrites the dimensions declared on an SVG document's root tag.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("no <svg> root tag found in input")]
    MalformedInput,

    #[error("cannot resolve a viewBox {0}: neither a declared nor a requested value exists")]
    InvalidDimensions(&'static str),
}

/// Rewrites `width`/`height` on the first `<svg ...>` open tag and synthesizes
/// a `viewBox` when the tag has none. Everything outside the root tag span is
/// copied byte-for-byte.
///
/// Attribute values keep their source quoting. Unquoted values containing
/// spaces are merged back onto the previous attribute, which makes the
/// tokenizer tolerant of multi-word values but fragile against other irregular
/// spacing.
pub fn rewrite_dimensions(
    svg: &str,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<String, ScaleError> {
    let start = svg.find("<svg").ok_or(ScaleError::MalformedInput)?;
    let end = find_tag_end(svg, start).ok_or(ScaleError::MalformedInput)?;

    let tag_body = &svg[start + "<svg".len()..end];
    // A self-closing root tag keeps its trailing slash through the rewrite.
    let (tag_body, self_closing) = match tag_body.trim_end().strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (tag_body, false),
    };
    let mut attrs = parse_attributes(tag_body);

    let original_width = attr_value(&attrs, "width").map_or(0, numeric_prefix);
    let original_height = attr_value(&attrs, "height").map_or(0, numeric_prefix);
    log::debug!(
        "declared dimensions {}x{}, requested {:?}x{:?}",
        original_width,
        original_height,
        target_width,
        target_height
    );

    if let Some(width) = target_width {
        set_attr(&mut attrs, "width", &width.to_string());
    }
    if let Some(height) = target_height {
        set_attr(&mut attrs, "height", &height.to_string());
    }

    if attr_value(&attrs, "viewBox").is_none() {
        let view_width = match (original_width, target_width) {
            (w, _) if w > 0 => w,
            (_, Some(w)) => w,
            _ => return Err(ScaleError::InvalidDimensions("width")),
        };
        let view_height = match (original_height, target_height) {
            (h, _) if h > 0 => h,
            (_, Some(h)) => h,
            _ => return Err(ScaleError::InvalidDimensions("height")),
        };
        attrs.push((
            "viewBox".to_string(),
            format!("\"0 0 {} {}\"", view_width, view_height),
        ));
    }

    let mut tag = String::from("<svg");
    for (name, value) in &attrs {
        tag.push(' ');
        tag.push_str(name);
        tag.push('=');
        tag.push_str(value);
    }
    tag.push_str(if self_closing { " />" } else { " >" });

    Ok(format!("{}{}{}", &svg[..start], tag, &svg[end + 1..]))
}

/// Finds the byte index of the `>` terminating the tag opened at `start`.
/// A `>` inside a quoted attribute value does not terminate the tag.
fn find_tag_end(svg: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, ch) in svg[start..].char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => return Some(start + i),
                _ => {}
            },
        }
    }
    None
}

/// Splits the inside of an open tag into `name=value` pairs, first-seen order.
/// Newlines count as spaces and carriage returns are dropped. A token with no
/// `=` continues the previous attribute's value.
fn parse_attributes(tag_body: &str) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();

    for token in tokenize(tag_body) {
        match token.split_once('=') {
            Some((name, value)) => attrs.push((name.to_string(), value.to_string())),
            None => {
                if let Some((_, value)) = attrs.last_mut() {
                    value.push(' ');
                    value.push_str(&token);
                } else {
                    log::debug!("dropping stray token before any attribute: {}", token);
                }
            }
        }
    }

    attrs
}

fn tokenize(tag_body: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote = None;

    for ch in tag_body.chars() {
        if ch == '\r' {
            continue;
        }
        let ch = if ch == '\n' { ' ' } else { ch };
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None if ch == '"' || ch == '\'' => {
                current.push(ch);
                quote = Some(ch);
            }
            None if ch == ' ' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn attr_value<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
}

/// Sets an attribute to a double-quoted value, appending it when absent.
fn set_attr(attrs: &mut Vec<(String, String)>, name: &str, value: &str) {
    let quoted = format!("\"{}\"", value);
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some((_, slot)) => *slot = quoted,
        None => attrs.push((name.to_string(), quoted)),
    }
}

/// Parses the leading digits of an attribute value, ignoring quotes and any
/// unit suffix. Missing or non-numeric values parse as 0.
fn numeric_prefix(value: &str) -> u32 {
    let unquoted = value.trim_matches(|c| c == '"' || c == '\'');
    let digits: String = unquoted.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
