//! Page rendering.
//!
//! [`PageRenderer`] is the seam between page enumeration and the templating
//! layer. [`SiteRenderer`] is the implementation shared by the live server and
//! the baker.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use minijinja::{context, Value};

use folio_index::resolver::humanize;
use folio_index::{AssetElement, AssetIndex, AssetType, ContentResolver};
use folio_markdown::{parse_document, render_markdown};

use crate::route::Route;
use crate::templates::{AssetView, NavLink, TemplateEngine};

/// Placeholder replaced by the highlight carousel in custom pages.
pub const CAROUSEL_TAG: &str = "{{folio-carousel}}";

/// Renders a route to HTML.
pub trait PageRenderer: Send + Sync {
    fn render(&self, route: &Route) -> Result<String, RenderError>;
}

/// Errors raised while rendering a single route.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),
}

impl From<minijinja::Error> for RenderError {
    fn from(e: minijinja::Error) -> Self {
        Self::TemplateError(e.to_string())
    }
}

/// Site-wide values available to every page.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Site title
    pub title: String,

    /// Site description, shown on the home page
    pub description: String,

    /// Extra stylesheet URLs
    pub stylesheets: Vec<String>,

    /// Header links
    pub top_links: Vec<NavLink>,

    /// Footer links
    pub footer_links: Vec<NavLink>,

    /// Directory holding custom markdown pages
    pub custom_pages_dir: PathBuf,

    /// Number of images shown in the carousel
    pub highlights: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            stylesheets: vec![],
            top_links: vec![NavLink {
                label: "Gallery".to_string(),
                target: "/gallery".to_string(),
            }],
            footer_links: vec![],
            custom_pages_dir: PathBuf::from("custom_pages"),
            highlights: 3,
        }
    }
}

/// Renders every page of the site from the asset index and custom pages.
pub struct SiteRenderer {
    index: Arc<AssetIndex>,
    resolver: ContentResolver,
    settings: SiteSettings,
    templates: TemplateEngine,
}

impl SiteRenderer {
    pub fn new(index: Arc<AssetIndex>, resolver: ContentResolver, settings: SiteSettings) -> Self {
        Self {
            index,
            resolver,
            settings,
            templates: TemplateEngine::new(),
        }
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Values shared by every template.
    fn page_context(&self, page_title: Option<&str>, description: &str) -> Value {
        context! {
            site_title => &self.settings.title,
            page_title => page_title,
            description => description,
            stylesheets => &self.settings.stylesheets,
            top_links => &self.settings.top_links,
            footer_links => &self.settings.footer_links,
        }
    }

    fn view(&self, element: &AssetElement) -> AssetView {
        AssetView::new(element, &self.resolver)
    }

    /// The first few images of the index.
    fn highlights(&self) -> Vec<AssetView> {
        self.index
            .elements()
            .iter()
            .filter(|e| e.asset_type() == AssetType::Image)
            .take(self.settings.highlights)
            .map(|e| self.view(e))
            .collect()
    }

    fn render_home(&self) -> Result<String, RenderError> {
        let ctx = context! {
            highlights => self.highlights(),
            ..self.page_context(None, &self.settings.description)
        };
        Ok(self.templates.render("home.html", ctx)?)
    }

    fn render_gallery(&self) -> Result<String, RenderError> {
        let elements: Vec<AssetView> = self.index.elements().iter().map(|e| self.view(e)).collect();
        let ctx = context! {
            elements => elements,
            ..self.page_context(Some("Gallery"), &self.settings.description)
        };
        Ok(self.templates.render("gallery.html", ctx)?)
    }

    fn render_custom_page(&self, name: &str) -> Result<String, RenderError> {
        // Names come straight from request paths on the live server.
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(RenderError::NotFound(format!("/{}", name)));
        }

        let path = self.settings.custom_pages_dir.join(format!("{}.md", name));
        let source = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RenderError::NotFound(format!("/{}", name)),
            _ => RenderError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;

        let doc = parse_document(&source).map_err(|e| RenderError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut content = doc.html.clone();
        if content.contains(CAROUSEL_TAG) {
            let carousel = self
                .templates
                .render("carousel.html", context! { highlights => self.highlights() })?;
            content = content.replace(CAROUSEL_TAG, &carousel);
        }

        let title = doc
            .title()
            .map(String::from)
            .unwrap_or_else(|| humanize(name));
        let description = doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.description.as_deref())
            .unwrap_or("");

        let ctx = context! {
            content => content,
            ..self.page_context(Some(&title), description)
        };
        Ok(self.templates.render("page.html", ctx)?)
    }

    fn render_asset_page(&self, identifier: &str) -> Result<String, RenderError> {
        let element = self
            .index
            .get(identifier)
            .ok_or_else(|| RenderError::NotFound(format!("/portfolio/{}", identifier)))?;

        let template = match element.asset_type() {
            AssetType::Image => "image.html",
            AssetType::Video => "video.html",
            AssetType::Audio => "audio.html",
            AssetType::Unsupported => "file.html",
        };

        // A caption document is markdown; the fallback title is plain text.
        let caption = match self.resolver.caption_text(element) {
            Some(text) => Value::from_safe_string(render_markdown(&text)),
            None => Value::from(self.resolver.resolve_caption(element)),
        };

        let asset = self.view(element);
        let ctx = context! {
            caption => caption,
            previous => self.index.before(element).map(|e| self.view(e)),
            next => self.index.after(element).map(|e| self.view(e)),
            ..self.page_context(Some(&asset.title), "")
        };
        let ctx = context! { asset => asset, ..ctx };

        Ok(self.templates.render(template, ctx)?)
    }
}

impl PageRenderer for SiteRenderer {
    fn render(&self, route: &Route) -> Result<String, RenderError> {
        match route {
            Route::Home => self.render_home(),
            Route::Gallery => self.render_gallery(),
            Route::CustomPage(name) => self.render_custom_page(name),
            Route::AssetPage(identifier) => self.render_asset_page(identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _temp: TempDir,
        renderer: SiteRenderer,
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> Fixture {
        let temp = tempdir().unwrap();
        let assets = temp.path().join("portfolio");
        let pages = temp.path().join("custom_pages");

        write(&assets, "a_first.jpg", "jpg");
        write(&assets, "a_first.md", "A *quiet* morning.");
        write(&assets, "b_clip.mp4", "mp4");
        write(&assets, "c_song.mp3", "mp3");
        write(&assets, "d_notes.pdf", "pdf");
        write(&pages, "about.md", "---\ntitle: About me\n---\nHello.\n\n{{folio-carousel}}\n");
        write(&pages, "contact.md", "Write to me.");

        let index = Arc::new(AssetIndex::build(&assets));
        let settings = SiteSettings {
            title: "Jane Doe".to_string(),
            custom_pages_dir: pages,
            ..Default::default()
        };
        let renderer = SiteRenderer::new(index, ContentResolver::default(), settings);

        Fixture {
            _temp: temp,
            renderer,
        }
    }

    #[test]
    fn renders_home_with_carousel() {
        let f = fixture();

        let html = f.renderer.render(&Route::Home).unwrap();

        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains("carousel-slide"));
        assert!(html.contains(r#"src="/portfolio/a_first.jpg""#));
    }

    #[test]
    fn renders_gallery_with_every_asset() {
        let f = fixture();

        let html = f.renderer.render(&Route::Gallery).unwrap();

        for url in ["/portfolio/a_first", "/portfolio/b_clip", "/portfolio/c_song", "/portfolio/d_notes"] {
            assert!(html.contains(&format!(r#"href="{}""#, url)), "{url}");
        }
    }

    #[test]
    fn renders_asset_page_with_caption_and_neighbors() {
        let f = fixture();

        let html = f.renderer.render(&Route::AssetPage("b_clip".into())).unwrap();

        assert!(html.contains("<video"));
        assert!(html.contains("<title>B Clip - Jane Doe</title>"));
        assert!(html.contains(r#"href="/portfolio/a_first" class="previous""#));
        assert!(html.contains(r#"href="/portfolio/c_song" class="next""#));
        assert!(html.contains("B Clip"));

        let first = f.renderer.render(&Route::AssetPage("a_first".into())).unwrap();
        assert!(first.contains("<em>quiet</em>"));
        assert!(!first.contains("class=\"previous\""));
    }

    #[test]
    fn picks_template_by_type() {
        let f = fixture();

        let audio = f.renderer.render(&Route::AssetPage("c_song".into())).unwrap();
        let file = f.renderer.render(&Route::AssetPage("d_notes".into())).unwrap();

        assert!(audio.contains("<audio"));
        assert!(file.contains("class=\"download\""));
    }

    #[test]
    fn renders_custom_pages() {
        let f = fixture();

        let about = f.renderer.render(&Route::CustomPage("about".into())).unwrap();
        let contact = f.renderer.render(&Route::CustomPage("contact".into())).unwrap();

        assert!(about.contains("<title>About me - Jane Doe</title>"));
        assert!(about.contains("carousel-slide"));
        assert!(!about.contains(CAROUSEL_TAG));
        assert!(contact.contains("<title>Contact - Jane Doe</title>"));
    }

    #[test]
    fn missing_pages_are_not_found() {
        let f = fixture();

        for route in [
            Route::AssetPage("nope".into()),
            Route::CustomPage("nope".into()),
            Route::CustomPage("../portfolio/a_first".into()),
        ] {
            assert!(matches!(f.renderer.render(&route), Err(RenderError::NotFound(_))), "{route}");
        }
    }
}
