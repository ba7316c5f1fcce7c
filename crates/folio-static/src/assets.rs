//! Built-in stylesheet and script.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// File name of the stylesheet under `assets/`.
    pub const CSS_FILE: &'static str = "folio.css";

    /// File name of the script under `assets/`.
    pub const JS_FILE: &'static str = "folio.js";

    /// The stylesheet, minified when `minify` is set.
    ///
    /// Falls back to the unminified source if minification fails.
    pub fn css(minify: bool) -> String {
        if !minify {
            return DEFAULT_CSS.to_string();
        }
        Self::minify_css(DEFAULT_CSS).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            DEFAULT_CSS.to_string()
        })
    }

    /// The carousel script.
    pub fn js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Folio portfolio theme */

:root {
  --background: #fafafa;
  --foreground: #1c1c1c;
  --muted: #6b6b6b;
  --border: #e2e2e2;
  --accent: #2f5d8a;
  --content-width: 1100px;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
  min-height: 100vh;
  display: flex;
  flex-direction: column;
}

a {
  color: var(--accent);
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 1rem 2rem;
  border-bottom: 1px solid var(--border);
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.top-links a,
.site-footer a {
  margin-left: 1rem;
  color: var(--muted);
  text-decoration: none;
}

.top-links a:hover,
.site-footer a:hover {
  color: var(--foreground);
}

.site-main {
  flex: 1;
  width: 100%;
  max-width: var(--content-width);
  margin: 0 auto;
  padding: 2rem;
}

.site-footer {
  padding: 1rem 2rem;
  border-top: 1px solid var(--border);
  text-align: center;
}

h1 {
  font-size: 2rem;
  margin-bottom: 1rem;
}

.lead {
  color: var(--muted);
  margin-bottom: 1.5rem;
}

.button {
  display: inline-block;
  padding: 0.5rem 1rem;
  border: 1px solid var(--accent);
  border-radius: 0.25rem;
  text-decoration: none;
}

/* Carousel */
.carousel {
  position: relative;
  overflow: hidden;
  margin-bottom: 1.5rem;
}

.carousel-track {
  display: flex;
}

.carousel-slide {
  flex: 0 0 100%;
  transition: transform 0.4s ease;
}

.carousel-slide img {
  width: 100%;
  max-height: 70vh;
  object-fit: contain;
}

.carousel .prev,
.carousel .next {
  position: absolute;
  top: 50%;
  transform: translateY(-50%);
  background: rgba(0, 0, 0, 0.4);
  color: #fff;
  border: none;
  font-size: 2rem;
  padding: 0 0.75rem;
  cursor: pointer;
}

.carousel .prev {
  left: 0.5rem;
}

.carousel .next {
  right: 0.5rem;
}

/* Gallery */
.gallery-grid {
  list-style: none;
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
  gap: 1rem;
}

.gallery-item a {
  display: block;
  color: var(--foreground);
  text-decoration: none;
}

.gallery-item img,
.gallery-item video,
.gallery-item .tile {
  width: 100%;
  aspect-ratio: 1;
  object-fit: cover;
  background: var(--border);
}

.gallery-item .tile {
  display: flex;
  align-items: center;
  justify-content: center;
  font-weight: 700;
  color: var(--muted);
}

.gallery-item .caption {
  display: block;
  font-size: 0.9rem;
  padding-top: 0.25rem;
}

/* Asset pages */
.asset .media img,
.asset .media video {
  display: block;
  max-width: 100%;
  max-height: 80vh;
  margin: 0 auto;
}

.asset .media audio {
  width: 100%;
}

.asset-caption {
  margin: 1.5rem 0;
}

.asset-nav {
  display: flex;
  justify-content: space-between;
}

/* Text pages */
.text-page h1,
.text-page h2,
.text-page h3 {
  margin: 1.5rem 0 0.75rem;
}

.text-page p,
.text-page ul,
.text-page ol {
  margin-bottom: 1rem;
}

.text-page ul,
.text-page ol {
  padding-left: 1.5rem;
}
"#;

const DEFAULT_JS: &str = r#"// Folio carousel
document.addEventListener("DOMContentLoaded", () => {
  document.querySelectorAll(".carousel").forEach((carousel) => {
    const slides = carousel.querySelectorAll(".carousel-slide");
    const prev = carousel.querySelector(".prev");
    const next = carousel.querySelector(".next");
    let current = 0;

    const show = () => {
      slides.forEach((slide) => {
        slide.style.transform = `translateX(${-100 * current}%)`;
      });
    };

    if (slides.length === 0) return;
    show();

    prev?.addEventListener("click", () => {
      current = (current - 1 + slides.length) % slides.length;
      show();
    });
    next?.addEventListener("click", () => {
      current = (current + 1) % slides.length;
      show();
    });
  });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minifies_stylesheet() {
        let full = AssetPipeline::css(false);
        let minified = AssetPipeline::css(true);

        assert!(minified.len() < full.len());
        assert!(minified.contains(".carousel-slide"));
    }

    #[test]
    fn script_drives_carousel() {
        assert!(AssetPipeline::js().contains(".carousel-slide"));
    }
}
