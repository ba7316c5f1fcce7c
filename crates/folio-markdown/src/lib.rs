//! Markdown rendering for folio custom pages and captions.
//!
//! Extracts optional YAML front matter and renders the remaining body to HTML.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{parse_document, render_markdown, Document, ParseError};
