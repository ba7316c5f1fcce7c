//! Logical pages of the site and their enumeration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use folio_index::AssetIndex;

/// Page names that would overwrite other outputs of the bake.
const RESERVED_PAGE_NAMES: &[&str] = &["index", "gallery", "portfolio", "assets", "static"];

/// A page the site can render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Gallery,
    CustomPage(String),
    AssetPage(String),
}

impl Route {
    /// Path of the baked file, relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        match self {
            Self::Home => PathBuf::from("index.html"),
            Self::Gallery => PathBuf::from("gallery.html"),
            Self::CustomPage(name) => PathBuf::from(format!("{}.html", name)),
            Self::AssetPage(id) => {
                let mut path = PathBuf::from("portfolio");
                path.extend(format!("{}.html", id).split('/'));
                path
            }
        }
    }

    /// URL path of the page on the live server.
    pub fn url_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Gallery => "/gallery".to_string(),
            Self::CustomPage(name) => format!("/{}", name),
            Self::AssetPage(id) => format!("/portfolio/{}", id),
        }
    }

    /// Number of directories between the output root and the baked file.
    pub fn depth(&self) -> usize {
        match self {
            Self::Home | Self::Gallery | Self::CustomPage(_) => 0,
            Self::AssetPage(id) => 1 + id.matches('/').count(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_path())
    }
}

/// Every page of the site: home, gallery, custom pages as given, then one
/// page per asset in index order.
pub fn enumerate(index: &AssetIndex, custom_pages: &[String]) -> Vec<Route> {
    let mut routes = Vec::with_capacity(2 + custom_pages.len() + index.len());

    routes.push(Route::Home);
    routes.push(Route::Gallery);
    routes.extend(custom_pages.iter().cloned().map(Route::CustomPage));
    routes.extend(
        index
            .elements()
            .iter()
            .map(|e| Route::AssetPage(e.identifier().to_string())),
    );

    routes
}

/// Names of the markdown pages directly inside `dir`, sorted.
///
/// A missing directory yields no pages.
pub fn discover_custom_pages(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("No custom pages in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
        .filter(|name| {
            if RESERVED_PAGE_NAMES.contains(&name.as_str()) {
                tracing::warn!("Skipping custom page '{}': the name is reserved", name);
                false
            } else {
                true
            }
        })
        .collect();

    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn computes_output_paths() {
        assert_eq!(Route::Home.output_path(), PathBuf::from("index.html"));
        assert_eq!(Route::Gallery.output_path(), PathBuf::from("gallery.html"));
        assert_eq!(
            Route::CustomPage("about".into()).output_path(),
            PathBuf::from("about.html")
        );
        assert_eq!(
            Route::AssetPage("travel/v1.2".into()).output_path(),
            PathBuf::from("portfolio/travel/v1.2.html")
        );
    }

    #[test]
    fn computes_depth() {
        assert_eq!(Route::Home.depth(), 0);
        assert_eq!(Route::CustomPage("about".into()).depth(), 0);
        assert_eq!(Route::AssetPage("photo".into()).depth(), 1);
        assert_eq!(Route::AssetPage("a/b/photo".into()).depth(), 3);
    }

    #[test]
    fn enumerates_groups_in_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.jpg"), b"b").unwrap();
        fs::write(temp.path().join("a.mp4"), b"a").unwrap();
        let index = AssetIndex::build(temp.path());

        let routes = enumerate(&index, &["contact".to_string(), "about".to_string()]);

        assert_eq!(
            routes,
            vec![
                Route::Home,
                Route::Gallery,
                Route::CustomPage("contact".into()),
                Route::CustomPage("about".into()),
                Route::AssetPage("a".into()),
                Route::AssetPage("b".into()),
            ]
        );
    }

    #[test]
    fn discovers_markdown_pages() {
        let temp = tempdir().unwrap();
        for file in ["contact.md", "about.md", "gallery.md", "notes.txt"] {
            fs::write(temp.path().join(file), "# Page").unwrap();
        }
        fs::create_dir(temp.path().join("nested.md")).unwrap();

        assert_eq!(discover_custom_pages(temp.path()), vec!["about", "contact"]);
        assert!(discover_custom_pages(&temp.path().join("missing")).is_empty());
    }
}
