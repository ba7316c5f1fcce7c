//! Link rewriting for static export.
//!
//! Pages are rendered with root-relative links (`/gallery`,
//! `/portfolio/photo1`) that only work behind a server. The rewriter turns
//! them into file-relative links (`./gallery.html`) so the baked tree can be
//! opened straight from disk or hosted under any prefix.
//!
//! Attribute values are located with a plain `href="…"` / `src="…"` scan, not
//! an HTML parser. Values containing escaped double quotes are cut at the
//! first quote and may be rewritten incorrectly.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<lead>\s)(?P<attr>href|src)="(?P<value>[^"]*)""#)
        .expect("Invalid link attribute regex")
});

/// Rewrites root-relative `href`/`src` values into file-relative ones.
///
/// Rewriting is idempotent: every rewritten value starts with `./` or `../`
/// and such values are never touched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRewriter {
    prefix: String,
}

impl LinkRewriter {
    /// Rewriter for pages at the root of the output tree (`./` links).
    pub fn new() -> Self {
        Self::at_depth(0)
    }

    /// Rewriter for pages `depth` directories below the output root.
    pub fn at_depth(depth: usize) -> Self {
        let prefix = if depth == 0 {
            "./".to_string()
        } else {
            "../".repeat(depth)
        };
        Self { prefix }
    }

    /// Rewrite every candidate link in `html`.
    pub fn rewrite<'a>(&self, html: &'a str) -> Cow<'a, str> {
        ATTRIBUTE_RE.replace_all(html, |caps: &Captures<'_>| {
            let value = &caps["value"];
            let rewritten = self.rewrite_value(value);
            format!(
                "{}{}=\"{}\"",
                &caps["lead"],
                &caps["attr"],
                rewritten.as_deref().unwrap_or(value)
            )
        })
    }

    /// Rewrite a single attribute value; `None` when it is left unchanged.
    pub fn rewrite_value(&self, value: &str) -> Option<String> {
        if !is_candidate(value) {
            return None;
        }

        if value == "/" {
            return Some(format!("{}index.html", self.prefix));
        }

        let split = value.find(['?', '#']).unwrap_or(value.len());
        let (path, suffix) = value.split_at(split);

        let mut path = path.to_string();
        if path.ends_with('/') {
            path.push_str("index.html");
        } else if !path.rsplit('/').next().unwrap_or("").contains('.') {
            path.push_str(".html");
        }

        // Bare values are already relative to the page's own directory.
        let (prefix, path) = match path.strip_prefix('/') {
            Some(rooted) => (self.prefix.as_str(), rooted),
            None => ("./", path.as_str()),
        };

        Some(format!("{}{}{}", prefix, path, suffix))
    }
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a value is a root- or bare-relative link that needs rewriting.
fn is_candidate(value: &str) -> bool {
    !(value.is_empty()
        || value.contains("://")
        || value.starts_with("//")
        || value.starts_with('#')
        || value.starts_with('?')
        || value.starts_with("./")
        || value.starts_with("../")
        || value == "."
        || value == ".."
        || has_scheme(value))
}

/// `mailto:`, `tel:`, `data:` and friends.
fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];

    scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite(html: &str) -> String {
        LinkRewriter::new().rewrite(html).into_owned()
    }

    #[test]
    fn rewrites_literal_cases() {
        assert_eq!(rewrite(r#"<a href="/">"#), r#"<a href="./index.html">"#);
        assert_eq!(rewrite(r#"<a href="/gallery">"#), r#"<a href="./gallery.html">"#);
        assert_eq!(
            rewrite(r#"<a href="/portfolio/photo1">"#),
            r#"<a href="./portfolio/photo1.html">"#
        );
        assert_eq!(
            rewrite(r#"<a href="https://example.com">"#),
            r#"<a href="https://example.com">"#
        );
        assert_eq!(rewrite(r##"<a href="#section">"##), r##"<a href="#section">"##);
    }

    #[test]
    fn keeps_file_extensions() {
        assert_eq!(
            rewrite(r#"<img src="/portfolio/travel/dawn.jpg">"#),
            r#"<img src="./portfolio/travel/dawn.jpg">"#
        );
        assert_eq!(
            rewrite(r#"<link href="/assets/folio.css">"#),
            r#"<link href="./assets/folio.css">"#
        );
    }

    #[test]
    fn prefixes_bare_relative_values() {
        assert_eq!(rewrite(r#"<a href="about">"#), r#"<a href="./about.html">"#);
        assert_eq!(rewrite(r#"<img src="img/a.png">"#), r#"<img src="./img/a.png">"#);
    }

    #[test]
    fn leaves_non_candidates_alone() {
        let html = concat!(
            r#"<a href="?page=2"> <a href="mailto:me@example.com"> "#,
            r#"<a href="//cdn.example.com/x"> <a href="./done.html"> "#,
            r#"<a href="../up.html"> <a href=""> <img src="data:image/png;base64,AA==">"#
        );

        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn appends_extension_before_query_and_fragment() {
        assert_eq!(
            rewrite(r##"<a href="/gallery#latest">"##),
            r##"<a href="./gallery.html#latest">"##
        );
        assert_eq!(rewrite(r#"<a href="/about?x=1">"#), r#"<a href="./about.html?x=1">"#);
        assert_eq!(rewrite(r#"<a href="/travel/">"#), r#"<a href="./travel/index.html">"#);
    }

    #[test]
    fn rewrites_duplicates_consistently() {
        let html = r#"<a href="/gallery">one</a><a href="/gallery">two</a>"#;

        assert_eq!(
            rewrite(html),
            r#"<a href="./gallery.html">one</a><a href="./gallery.html">two</a>"#
        );
    }

    #[test]
    fn ignores_attributes_without_leading_whitespace() {
        let html = r#"<img data-src="/lazy">"#;

        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn uses_parent_prefix_below_root() {
        let rewriter = LinkRewriter::at_depth(2);

        assert_eq!(
            rewriter.rewrite(r#"<a href="/"> <a href="/portfolio/a/b">"#),
            r#"<a href="../../index.html"> <a href="../../portfolio/a/b.html">"#
        );
        assert_eq!(
            rewriter.rewrite(r#"<a href="sibling">"#),
            r#"<a href="./sibling.html">"#
        );
    }

    #[test]
    fn rewriting_is_idempotent() {
        let fixtures = [
            r##"<nav><a href="/">Home</a> <a href="/gallery">Gallery</a> <a href="#top">Top</a></nav>"##,
            r#"<img src="/portfolio/x.jpg"><a href="about"></a><a href="/a/b/">dir</a>"#,
            r#"<a href="https://example.com/a"> <a href="/p?q=1#f"> <script src="/assets/folio.js"></script>"#,
            "<p>no links at all</p>",
        ];

        for depth in 0..3 {
            let rewriter = LinkRewriter::at_depth(depth);
            for html in fixtures {
                let once = rewriter.rewrite(html).into_owned();
                let twice = rewriter.rewrite(&once).into_owned();
                assert_eq!(once, twice);
            }
        }
    }
}
