//! Markdown document parser.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Parsed front matter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown body (without front matter)
    pub content: String,

    /// Rendered HTML of the body
    pub html: String,

    /// Text of the first heading, if any
    pub heading: Option<String>,
}

impl Document {
    /// Title from front matter, falling back to the first heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or(self.heading.as_deref())
    }
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Front matter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a markdown document with optional front matter.
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut heading: Option<String> = None;
    let mut in_heading = false;
    let mut heading_text = String::new();

    for event in Parser::new_ext(content, options()) {
        match event {
            Event::Start(Tag::Heading { .. }) if heading.is_none() => {
                in_heading = true;
            }
            Event::Text(text) | Event::Code(text) if in_heading => {
                heading_text.push_str(&text);
            }
            Event::End(TagEnd::Heading(_)) if in_heading => {
                in_heading = false;
                heading = Some(heading_text.trim().to_string());
            }
            _ => {}
        }
    }

    Ok(Document {
        frontmatter,
        content: content.to_string(),
        html: render_markdown(content),
        heading,
    })
}

/// Render markdown to HTML.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, options());

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_page_with_frontmatter() {
        let source = r#"---
title: About
---

# Behind the lens

Some **bold** words.
"#;

        let doc = parse_document(source).unwrap();

        assert_eq!(doc.title(), Some("About"));
        assert_eq!(doc.heading.as_deref(), Some("Behind the lens"));
        assert!(doc.html.contains("<h1>Behind the lens</h1>"));
        assert!(doc.html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let doc = parse_document("Intro text\n\n## Contact `me`\n\n# Later").unwrap();

        assert_eq!(doc.title(), Some("Contact me"));
    }

    #[test]
    fn no_title_without_heading() {
        let doc = parse_document("just a paragraph").unwrap();

        assert!(doc.title().is_none());
    }

    #[test]
    fn renders_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");

        assert!(html.contains("<table>"));
    }
}
