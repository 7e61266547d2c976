//! Line tokenizer
//!
//! Turns document text into [`Line`]s: one per structural line, carrying the
//! depth derived from the indentation prefix, whether a list marker was part
//! of that prefix, and the classified inline value. Document directives,
//! separators and comments produce no line.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use unity_catalog_core::NodeValue;

/// `%YAML`/`%TAG` directives and `--- !u!<class> &<id>` document separators
static IGNORED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(%YAML|%TAG|---)").expect("ignored-line pattern is valid"));

/// Indentation plus list markers. A `-` only counts when followed by
/// whitespace or the end of the line, so `-1` stays a value.
static LINE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[ \t]|-(?:[ \t]|$))*").expect("prefix pattern is valid"));

static FLOW_MAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{(.*)\}$").expect("flow map pattern is valid"));

static FLOW_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(.*)\]$").expect("flow sequence pattern is valid"));

/// One structural line of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based line number in the source text
    pub number: usize,
    pub depth: usize,
    /// The prefix contained a `- ` list marker
    pub list_item: bool,
    /// Empty for bare list entries such as `- {fileID: 0}` or `- _NORMALMAP`
    pub name: String,
    pub value: NodeValue,
    /// Source text without trailing whitespace, for diagnostics
    pub content: String,
}

/// Tokenize a whole document
pub fn read_lines(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| read_line(index + 1, raw))
        .collect()
}

/// Tokenize a single line, or `None` when it carries no structure
pub fn read_line(number: usize, raw: &str) -> Option<Line> {
    let raw = raw.trim_end();
    let trimmed = raw.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || IGNORED_LINE.is_match(raw) {
        return None;
    }

    let prefix_len = LINE_PREFIX.find(raw).map_or(0, |m| m.end());
    let prefix = &raw[..prefix_len];
    // A marker at the very end of the line stands for "- " so it lines up
    // with its siblings
    let width = if prefix.ends_with('-') {
        prefix_len + 1
    } else {
        prefix_len
    };
    let (name, raw_value) = split_name(&raw[prefix_len..]);

    Some(Line {
        number,
        depth: width / 2 + 1,
        list_item: prefix.contains('-'),
        name,
        value: classify_value(raw_value),
        content: raw.to_string(),
    })
}

/// Split `name: value` at the first colon followed by whitespace or the end
/// of the line. Flow collections and quoted text are bare values.
fn split_name(rest: &str) -> (String, &str) {
    if rest.starts_with(['{', '[', '\'', '"']) {
        return (String::new(), rest.trim());
    }
    let bytes = rest.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b':' && matches!(bytes.get(index + 1), None | Some(b' ') | Some(b'\t')) {
            return (rest[..index].trim().to_string(), rest[index + 1..].trim());
        }
    }
    (String::new(), rest.trim())
}

/// Classify the text after the colon
pub fn classify_value(raw: &str) -> NodeValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return NodeValue::Absent;
    }
    if let Some(caps) = FLOW_MAP.captures(raw) {
        return NodeValue::Map(parse_flow_map(&caps[1]));
    }
    if let Some(caps) = FLOW_SEQUENCE.captures(raw) {
        let items = split_top_level(&caps[1])
            .into_iter()
            .map(unquote)
            .collect();
        return NodeValue::Sequence(items);
    }
    NodeValue::Scalar(unquote(raw))
}

fn parse_flow_map(inner: &str) -> IndexMap<String, String> {
    split_top_level(inner)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((key, value)) => (key.trim().to_string(), unquote(value)),
            None => (entry.to_string(), String::new()),
        })
        .collect()
}

/// Split on commas that are not nested inside braces, brackets or quotes
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut nesting = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (index, ch) in inner.char_indices() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '{' | '[') => nesting += 1,
            (None, '}' | ']') => nesting = nesting.saturating_sub(1),
            (None, ',') if nesting == 0 => {
                parts.push(inner[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(inner[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 {
        if let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
        if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
    }
    raw.to_string()
}
