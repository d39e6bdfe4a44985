// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Inline markup tags for portfolio and resume text values.
//!
//! Data files may embed a small fixed set of tags inside plain strings:
//! `<sb>…</sb>` for strong emphasis, `<code>…</code>` for inline code and
//! `<link href="URL">…</link>` for hyperlinks. Tags nest arbitrarily.
//! Literal newlines split the text into lines joined by `<br>`.
//!
//! This is a linear scanner, not a grammar: an unclosed or malformed tag is
//! passed through as literal text and scanning resumes one byte later.

use minijinja::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static HREF_REGEX: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r#"href="([^"]*)""#));

const STRONG_OPEN: &str = "<sb>";
const STRONG_CLOSE: &str = "</sb>";
const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";
const LINK_OPEN: &str = "<link";
const LINK_CLOSE: &str = "</link>";

/// One node of formatted text, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Strong(Vec<Node>),
    Code(Vec<Node>),
    Link { href: String, children: Vec<Node> },
    LineBreak,
}

#[derive(Clone, Copy)]
enum TagKind {
    Strong,
    Code,
    Link,
}

/// Parse a string with inline markup tags into an ordered node sequence.
///
/// Literal `\n` characters become [`Node::LineBreak`] entries between the
/// parsed lines.
pub fn format_text(input: &str) -> Vec<Node> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut nodes = Vec::new();
    let mut lines = input.split('\n').peekable();
    while let Some(line) = lines.next() {
        nodes.extend(parse_line(line));
        if lines.peek().is_some() {
            nodes.push(Node::LineBreak);
        }
    }
    nodes
}

fn parse_line(input: &str) -> Vec<Node> {
    let mut result = Vec::new();
    let mut cursor = 0;

    while cursor < input.len() {
        let rest = &input[cursor..];

        let mut earliest: Option<(usize, TagKind)> = None;
        for (found, kind) in [
            (rest.find(STRONG_OPEN), TagKind::Strong),
            (rest.find(CODE_OPEN), TagKind::Code),
            (rest.find(LINK_OPEN), TagKind::Link),
        ] {
            if let Some(offset) = found {
                if earliest.map_or(true, |(current, _)| offset < current) {
                    earliest = Some((offset, kind));
                }
            }
        }

        let (offset, kind) = match earliest {
            Some(found) => found,
            None => {
                // No tag left on this line; the remainder is plain text.
                push_text(&mut result, rest);
                break;
            }
        };

        if offset > 0 {
            push_text(&mut result, &rest[..offset]);
        }

        let tag_start = cursor + offset;
        match parse_tag(input, tag_start, kind) {
            Some((node, next_cursor)) => {
                result.push(node);
                cursor = next_cursor;
            }
            None => {
                // Malformed tag: emit the literal `<` and keep scanning.
                push_text(&mut result, &input[tag_start..tag_start + 1]);
                cursor = tag_start + 1;
            }
        }
    }

    result
}

/// Try to parse one complete tag starting at `tag_start`.
/// Returns the node and the byte offset just past the closing tag.
fn parse_tag(input: &str, tag_start: usize, kind: TagKind) -> Option<(Node, usize)> {
    match kind {
        TagKind::Strong => {
            let content_start = tag_start + STRONG_OPEN.len();
            let close = input[content_start..].find(STRONG_CLOSE)? + content_start;
            let children = parse_line(&input[content_start..close]);
            Some((Node::Strong(children), close + STRONG_CLOSE.len()))
        }
        TagKind::Code => {
            let content_start = tag_start + CODE_OPEN.len();
            let close = input[content_start..].find(CODE_CLOSE)? + content_start;
            let children = parse_line(&input[content_start..close]);
            Some((Node::Code(children), close + CODE_CLOSE.len()))
        }
        TagKind::Link => {
            let open_end = input[tag_start..].find('>')? + tag_start;
            let href_regex = HREF_REGEX.as_ref().ok()?;
            let href = href_regex
                .captures(&input[tag_start..open_end])?
                .get(1)?
                .as_str()
                .to_string();
            let content_start = open_end + 1;
            let close = input[content_start..].find(LINK_CLOSE)? + content_start;
            let children = parse_line(&input[content_start..close]);
            Some((
                Node::Link { href, children },
                close + LINK_CLOSE.len(),
            ))
        }
    }
}

/// Append text, coalescing with a trailing text node.
fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(existing)) = nodes.last_mut() {
        existing.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// Render a node sequence to HTML with text content escaped.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut html = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => html.push_str(&escape_html(text)),
            Node::Strong(children) => {
                html.push_str("<strong>");
                html.push_str(&render_nodes(children));
                html.push_str("</strong>");
            }
            Node::Code(children) => {
                html.push_str("<code>");
                html.push_str(&render_nodes(children));
                html.push_str("</code>");
            }
            Node::Link { href, children } => {
                html.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape_html(href)
                ));
                html.push_str(&render_nodes(children));
                html.push_str("</a>");
            }
            Node::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

/// Concatenated text content with the tag delimiters stripped.
/// Line breaks come back as literal newlines.
pub fn visible_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        match node {
            Node::Text(value) => text.push_str(value),
            Node::Strong(children) | Node::Code(children) => {
                text.push_str(&visible_text(children));
            }
            Node::Link { children, .. } => text.push_str(&visible_text(children)),
            Node::LineBreak => text.push('\n'),
        }
    }
    text
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Minijinja filter: parse markup tags and return safe HTML.
pub fn format_text_filter(value: String) -> Value {
    Value::from_safe_string(render_nodes(&format_text(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let nodes = format_text("just some text");
        assert_eq!(nodes, vec![Node::Text("just some text".to_string())]);
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        assert!(format_text("").is_empty());
    }

    #[test]
    fn newlines_become_line_breaks() {
        let nodes = format_text("first\nsecond");
        assert_eq!(
            nodes,
            vec![
                Node::Text("first".to_string()),
                Node::LineBreak,
                Node::Text("second".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_newline_keeps_break_position() {
        let nodes = format_text("line\n");
        assert_eq!(nodes, vec![Node::Text("line".to_string()), Node::LineBreak]);
    }

    #[test]
    fn strong_tag_yields_three_ordered_segments() {
        let nodes = format_text("a<sb>b</sb>c");
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".to_string()),
                Node::Strong(vec![Node::Text("b".to_string())]),
                Node::Text("c".to_string()),
            ]
        );
    }

    #[test]
    fn code_tag_parses() {
        let nodes = format_text("run <code>cargo build</code> first");
        assert_eq!(
            nodes,
            vec![
                Node::Text("run ".to_string()),
                Node::Code(vec![Node::Text("cargo build".to_string())]),
                Node::Text(" first".to_string()),
            ]
        );
    }

    #[test]
    fn link_tag_extracts_href_and_text() {
        let nodes = format_text(r#"<link href="https://x">t</link>"#);
        assert_eq!(
            nodes,
            vec![Node::Link {
                href: "https://x".to_string(),
                children: vec![Node::Text("t".to_string())],
            }]
        );
    }

    #[test]
    fn tags_nest_arbitrarily() {
        let nodes = format_text(r#"<sb><link href="https://x">bold link</link></sb>"#);
        assert_eq!(
            nodes,
            vec![Node::Strong(vec![Node::Link {
                href: "https://x".to_string(),
                children: vec![Node::Text("bold link".to_string())],
            }])]
        );
    }

    #[test]
    fn unclosed_tag_degrades_to_literal_text() {
        let nodes = format_text("before <sb>no close");
        assert_eq!(
            nodes,
            vec![Node::Text("before <sb>no close".to_string())]
        );
    }

    #[test]
    fn link_without_href_degrades_to_literal_text() {
        let nodes = format_text("<link>t</link>");
        assert_eq!(nodes, vec![Node::Text("<link>t</link>".to_string())]);
    }

    #[test]
    fn visible_text_round_trips_in_order() {
        let input = r#"intro <sb>bold <code>nested</code></sb> and <link href="https://x">a link</link> end"#;
        let nodes = format_text(input);
        assert_eq!(
            visible_text(&nodes),
            "intro bold nested and a link end"
        );
    }

    #[test]
    fn visible_text_preserves_newlines() {
        let nodes = format_text("one\ntwo\nthree");
        assert_eq!(visible_text(&nodes), "one\ntwo\nthree");
    }

    #[test]
    fn render_escapes_plain_text() {
        let html = render_nodes(&format_text("5 > 4 & 3 < 4"));
        assert_eq!(html, "5 &gt; 4 &amp; 3 &lt; 4");
    }

    #[test]
    fn render_produces_nested_elements() {
        let html = render_nodes(&format_text(
            r#"see <sb><link href="https://x">docs</link></sb>"#,
        ));
        assert_eq!(
            html,
            r#"see <strong><a href="https://x" target="_blank" rel="noopener noreferrer">docs</a></strong>"#
        );
    }

    #[test]
    fn render_joins_lines_with_breaks() {
        let html = render_nodes(&format_text("a\nb"));
        assert_eq!(html, "a<br>b");
    }

    #[test]
    fn adjacent_text_is_coalesced_after_malformed_tag() {
        // `<sb ` never forms a recognized open tag, so the line stays text.
        let nodes = format_text("x <sb broken");
        assert_eq!(nodes, vec![Node::Text("x <sb broken".to_string())]);
    }

    #[test]
    fn consecutive_tags_keep_input_order() {
        let nodes = format_text("<sb>a</sb><code>b</code>");
        assert_eq!(
            nodes,
            vec![
                Node::Strong(vec![Node::Text("a".to_string())]),
                Node::Code(vec![Node::Text("b".to_string())]),
            ]
        );
    }
}
