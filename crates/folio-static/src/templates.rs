//! Template engine for rendering portfolio pages.
//!
//! Templates are embedded in the binary. Every internal link they emit is
//! root-relative (`/gallery`, `/portfolio/<id>`); the live server serves them
//! as-is and the baker rewrites them with [`LinkRewriter`](crate::LinkRewriter).

use minijinja::{AutoEscape, Environment, Error, ErrorKind, Output, State, Value};
use serde::Serialize;

use folio_index::{AssetElement, ContentResolver};

/// A link in the header or footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Display label
    pub label: String,
    /// Resolved URL (root-relative or absolute)
    pub target: String,
}

/// Template view of an asset.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    pub identifier: String,
    pub title: String,
    pub asset_type: String,
    pub extension: String,
    pub page_url: String,
    pub file_url: String,
}

impl AssetView {
    pub fn new(element: &AssetElement, resolver: &ContentResolver) -> Self {
        Self {
            identifier: element.identifier().to_string(),
            title: resolver.default_title(element),
            asset_type: element.asset_type().to_string(),
            extension: element.extension().to_string(),
            page_url: element.page_url(),
            file_url: element.file_url(),
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .unwrap_or_else(|e| panic!("Built-in template {} is invalid: {}", name, e));
        }
        env.set_formatter(url_preserving_formatter);

        Self { env }
    }

    /// Render `template` with `context`.
    pub fn render(&self, template: &str, context: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// HTML auto-escaping that leaves `/` alone.
///
/// The default escaper encodes `/` as `&#x2f;`, which hides root-relative
/// URLs from the static link rewriter.
fn url_preserving_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    if let (AutoEscape::Html, false, Some(text)) = (state.auto_escape(), value.is_safe(), value.as_str()) {
        return out
            .write_str(&escape_html(text))
            .map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write template output"));
    }
    minijinja::escape_formatter(out, state, value)
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE_TEMPLATE),
    ("carousel.html", CAROUSEL_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("gallery.html", GALLERY_TEMPLATE),
    ("page.html", PAGE_TEMPLATE),
    ("asset.html", ASSET_TEMPLATE),
    ("image.html", IMAGE_TEMPLATE),
    ("video.html", VIDEO_TEMPLATE),
    ("audio.html", AUDIO_TEMPLATE),
    ("file.html", FILE_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if page_title %}{{ page_title }} - {% endif %}{{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="/assets/folio.css">
  {% for style in stylesheets %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <header class="site-header">
    <a href="/" class="site-title">{{ site_title }}</a>
    <nav class="top-links">
    {% for link in top_links %}
      <a href="{{ link.target }}">{{ link.label }}</a>
    {% endfor %}
    </nav>
  </header>
  <main class="site-main">
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
  {% for link in footer_links %}
    <a href="{{ link.target }}">{{ link.label }}</a>
  {% endfor %}
  </footer>
  <script src="/assets/folio.js"></script>
</body>
</html>"##;

const CAROUSEL_TEMPLATE: &str = r##"<div class="carousel">
  <div class="carousel-track">
  {% for item in highlights %}
    <div class="carousel-slide">
      <a href="{{ item.page_url }}"><img src="{{ item.file_url }}" alt="{{ item.title }}"></a>
    </div>
  {% endfor %}
  </div>
  <button class="prev" type="button" aria-label="Previous">&#8249;</button>
  <button class="next" type="button" aria-label="Next">&#8250;</button>
</div>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<section class="home">
  <h1>{{ site_title }}</h1>
  {% if description %}<p class="lead">{{ description }}</p>{% endif %}
  {% if highlights %}{% include "carousel.html" %}{% endif %}
  <p><a href="/gallery" class="button">View the gallery</a></p>
</section>
{% endblock %}"##;

const GALLERY_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<section class="gallery">
  <h1>Gallery</h1>
  {% if elements %}
  <ul class="gallery-grid">
  {% for item in elements %}
    <li class="gallery-item gallery-{{ item.asset_type }}">
      <a href="{{ item.page_url }}">
      {% if item.asset_type == "image" %}
        <img src="{{ item.file_url }}" alt="{{ item.title }}" loading="lazy">
      {% elif item.asset_type == "video" %}
        <video src="{{ item.file_url }}" preload="metadata" muted></video>
      {% else %}
        <span class="tile">{{ item.extension | upper }}</span>
      {% endif %}
        <span class="caption">{{ item.title }}</span>
      </a>
    </li>
  {% endfor %}
  </ul>
  {% else %}
  <p>Nothing here yet.</p>
  {% endif %}
</section>
{% endblock %}"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<article class="text-page">
  {{ content | safe }}
</article>
{% endblock %}"##;

const ASSET_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<article class="asset asset-{{ asset.asset_type }}">
  <div class="media">{% block media %}{% endblock %}</div>
  <div class="asset-caption">{{ caption }}</div>
  <nav class="asset-nav">
    {% if previous %}<a href="{{ previous.page_url }}" class="previous">&larr; {{ previous.title }}</a>{% endif %}
    <a href="/gallery" class="back">Gallery</a>
    {% if next %}<a href="{{ next.page_url }}" class="next">{{ next.title }} &rarr;</a>{% endif %}
  </nav>
</article>
{% endblock %}"##;

const IMAGE_TEMPLATE: &str = r##"{% extends "asset.html" %}
{% block media %}<a href="{{ asset.file_url }}"><img src="{{ asset.file_url }}" alt="{{ asset.title }}"></a>{% endblock %}"##;

const VIDEO_TEMPLATE: &str = r##"{% extends "asset.html" %}
{% block media %}<video src="{{ asset.file_url }}" controls preload="metadata"></video>{% endblock %}"##;

const AUDIO_TEMPLATE: &str = r##"{% extends "asset.html" %}
{% block media %}<audio src="{{ asset.file_url }}" controls preload="metadata"></audio>{% endblock %}"##;

const FILE_TEMPLATE: &str = r##"{% extends "asset.html" %}
{% block media %}<a href="{{ asset.file_url }}" class="download">Download {{ asset.title }}</a>{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn base_context(page_title: &str) -> Value {
        context! {
            site_title => "Jane Doe",
            page_title => page_title,
            description => "",
            stylesheets => Vec::<String>::new(),
            top_links => vec![NavLink { label: "Gallery".into(), target: "/gallery".into() }],
            footer_links => Vec::<NavLink>::new(),
        }
    }

    #[test]
    fn renders_gallery_page() {
        let engine = TemplateEngine::new();
        let ctx = context! {
            elements => vec![AssetView {
                identifier: "dawn".into(),
                title: "Dawn".into(),
                asset_type: "image".into(),
                extension: "jpg".into(),
                page_url: "/portfolio/dawn".into(),
                file_url: "/portfolio/dawn.jpg".into(),
            }],
            ..base_context("Gallery")
        };

        let html = engine.render("gallery.html", ctx).unwrap();

        assert!(html.contains("<title>Gallery - Jane Doe</title>"));
        assert!(html.contains(r#"<a href="/portfolio/dawn">"#));
        assert!(html.contains(r#"src="/portfolio/dawn.jpg""#));
        assert!(html.contains(r#"<a href="/gallery">Gallery</a>"#));
    }

    #[test]
    fn escapes_titles_but_not_content() {
        let engine = TemplateEngine::new();
        let ctx = context! {
            content => "<p>trusted</p>",
            ..base_context("<b>x</b>")
        };

        let html = engine.render("page.html", ctx).unwrap();

        assert!(html.contains("<p>trusted</p>"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn escapes_quotes_in_urls() {
        let engine = TemplateEngine::new();
        let ctx = context! {
            site_title => "Jane Doe",
            content => "",
            top_links => vec![NavLink { label: "Odd".into(), target: "/a\"b".into() }],
        };

        let html = engine.render("page.html", ctx).unwrap();

        assert!(html.contains(r#"href="/a&quot;b""#));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let engine = TemplateEngine::new();

        assert!(engine.render("missing.html", base_context("Missing")).is_err());
    }
}
