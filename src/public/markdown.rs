// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use once_cell::sync::Lazy;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

static EXTERNAL_LINK_REGEX: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r#"<a href="(https?://[^"]+)"([^>]*)>"#));

#[derive(Debug)]
pub enum MarkdownRenderError {
    Regex(String),
}

impl std::fmt::Display for MarkdownRenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkdownRenderError::Regex(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for MarkdownRenderError {}

pub struct HtmlSanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner
            .strip_comments(true)
            .add_tags(&["span", "figure", "figcaption"])
            .link_rel(Some("noopener noreferrer"))
            .rm_tags(&["script", "link", "iframe", "object", "embed"]);
        Self { cleaner }
    }

    pub fn clean(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render a post body to sanitized HTML with external links opening in a
/// new tab.
pub fn render_markdown(
    body: &str,
    sanitizer: &HtmlSanitizer,
) -> Result<String, MarkdownRenderError> {
    let options = markdown_options();
    let parser = Parser::new_ext(body, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let sanitized_html = sanitizer.clean(&html_output);
    post_process_html(sanitized_html)
}

fn post_process_html(html: String) -> Result<String, MarkdownRenderError> {
    let external_regex = match EXTERNAL_LINK_REGEX.as_ref() {
        Ok(regex) => regex,
        Err(err) => {
            return Err(MarkdownRenderError::Regex(format!(
                "External link regex failed to compile: {}",
                err
            )));
        }
    };

    // Add target="_blank" to external links, preserving other attributes
    let html = external_regex.replace_all(&html, |caps: &regex::Captures| {
        let href = &caps[1];
        let other_attrs = &caps[2];
        if other_attrs.contains("target=") {
            caps[0].to_string()
        } else {
            format!(r#"<a href="{}"{} target="_blank">"#, href, other_attrs)
        }
    });

    Ok(html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let sanitizer = HtmlSanitizer::new();
        let html = render_markdown(
            "# Heading\n\nSome **bold** text.\n\n- item one\n- item two\n",
            &sanitizer,
        )
        .expect("render");

        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<li>item one</li>"));
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let sanitizer = HtmlSanitizer::new();
        let html = render_markdown(
            "| A | B |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n",
            &sanitizer,
        )
        .expect("render");

        assert!(html.contains("<table>"));
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn external_links_open_in_new_tab() {
        let sanitizer = HtmlSanitizer::new();
        let html = render_markdown("[docs](https://example.com)", &sanitizer).expect("render");
        assert!(
            html.contains(
                r#"<a href="https://example.com" rel="noopener noreferrer" target="_blank">"#
            )
        );
    }

    #[test]
    fn relative_links_stay_untouched() {
        let sanitizer = HtmlSanitizer::new();
        let html = render_markdown("[other post](/blog/post/other)", &sanitizer).expect("render");
        assert!(html.contains(r#"<a href="/blog/post/other""#));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn dangerous_html_is_stripped() {
        let sanitizer = HtmlSanitizer::new();
        let html = render_markdown(
            "text <script>alert('x')</script> <iframe src=\"evil\"></iframe> end",
            &sanitizer,
        )
        .expect("render");

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<iframe"));
        assert!(html.contains("text"));
        assert!(html.contains("end"));
    }
}
