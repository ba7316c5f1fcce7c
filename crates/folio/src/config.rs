//! Configuration file (folio.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use folio_index::ResolverConfig;
use folio_server::LiveServerConfig;
use folio_static::{BakeConfig, NavLink, SiteSettings};

/// Configuration file structure.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub portfolio: PortfolioSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default = "default_top_links")]
    pub top_link: Vec<LinkConfig>,
    #[serde(default)]
    pub footer_link: Vec<LinkConfig>,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Extra stylesheet URLs
    #[serde(default)]
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_portfolio_dir")]
    pub portfolio: PathBuf,
    #[serde(default = "default_custom_pages_dir")]
    pub custom_pages: PathBuf,
    #[serde(default = "default_static_dirs")]
    pub static_dirs: Vec<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioSection {
    #[serde(default = "default_caption_extension")]
    pub caption_extension: String,
    #[serde(default = "default_untitled_label")]
    pub untitled_label: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

/// A header or footer link as written in the config.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LinkConfig {
    pub label: String,
    pub target: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSection::default(),
            paths: PathsSection::default(),
            portfolio: PortfolioSection::default(),
            build: BuildSection::default(),
            top_link: default_top_links(),
            footer_link: vec![],
        }
    }
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            stylesheets: vec![],
        }
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            portfolio: default_portfolio_dir(),
            custom_pages: default_custom_pages_dir(),
            static_dirs: default_static_dirs(),
            output: default_output(),
        }
    }
}

impl Default for PortfolioSection {
    fn default() -> Self {
        Self {
            caption_extension: default_caption_extension(),
            untitled_label: default_untitled_label(),
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "My Portfolio".to_string()
}
fn default_portfolio_dir() -> PathBuf {
    PathBuf::from("portfolio")
}
fn default_custom_pages_dir() -> PathBuf {
    PathBuf::from("custom_pages")
}
fn default_static_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("static")]
}
fn default_output() -> PathBuf {
    PathBuf::from("bake_output")
}
fn default_caption_extension() -> String {
    "md".to_string()
}
fn default_untitled_label() -> String {
    "Untitled".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_top_links() -> Vec<LinkConfig> {
    vec![LinkConfig {
        label: "Gallery".to_string(),
        target: "[gallery]".to_string(),
    }]
}

/// Directory a config file's relative paths are resolved against.
pub fn config_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Resolve a configured link target into a URL.
///
/// `[home]` and `[gallery]` are special tags, absolute URLs pass through and
/// `name.md` points at the custom page `name`.
pub fn resolve_target(target: &str) -> Result<String> {
    if target.starts_with('[') && target.ends_with(']') {
        return match target {
            "[home]" => Ok("/".to_string()),
            "[gallery]" => Ok("/gallery".to_string()),
            _ => bail!("Invalid special link target: {}", target),
        };
    }

    if target.contains("://") {
        return Ok(target.to_string());
    }

    match target.strip_suffix(".md") {
        Some(name) if !name.is_empty() => Ok(format!("/{}", name.trim_start_matches('/'))),
        _ => bail!("Invalid link target: {}", target),
    }
}

impl SiteConfig {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    ///
    /// Relative `[paths]` entries are resolved against the directory holding
    /// the config file, whether or not the file exists.
    pub fn load(path: &Path) -> Result<Self> {
        let base = config_dir(path);

        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default().resolved()?.rebased(base));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config.rebased(base))
    }

    /// Parse a config document and resolve its link targets.
    pub fn parse(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.resolved()
    }

    fn resolved(mut self) -> Result<Self> {
        for link in self.top_link.iter_mut().chain(self.footer_link.iter_mut()) {
            link.target = resolve_target(&link.target)
                .with_context(|| format!("In link \"{}\"", link.label))?;
        }
        Ok(self)
    }

    fn rebased(mut self, base: &Path) -> Self {
        if base == Path::new(".") {
            return self;
        }

        let paths = &mut self.paths;
        paths.portfolio = base.join(&paths.portfolio);
        paths.custom_pages = base.join(&paths.custom_pages);
        paths.output = base.join(&paths.output);
        for dir in &mut paths.static_dirs {
            *dir = base.join(&*dir);
        }
        self
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            caption_extension: self.portfolio.caption_extension.clone(),
            untitled_label: self.portfolio.untitled_label.clone(),
        }
    }

    pub fn site_settings(&self) -> SiteSettings {
        let nav = |links: &[LinkConfig]| -> Vec<NavLink> {
            links
                .iter()
                .map(|l| NavLink {
                    label: l.label.clone(),
                    target: l.target.clone(),
                })
                .collect()
        };

        SiteSettings {
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            stylesheets: self.site.stylesheets.clone(),
            top_links: nav(&self.top_link),
            footer_links: nav(&self.footer_link),
            custom_pages_dir: self.paths.custom_pages.clone(),
            ..Default::default()
        }
    }

    pub fn bake_config(&self, minify: Option<bool>) -> BakeConfig {
        BakeConfig {
            asset_dir: self.paths.portfolio.clone(),
            static_dirs: self.paths.static_dirs.clone(),
            minify: minify.unwrap_or(self.build.minify),
        }
    }

    /// The live server serves only the first static directory.
    pub fn server_config(&self, port: u16, open: bool) -> LiveServerConfig {
        LiveServerConfig {
            asset_dir: self.paths.portfolio.clone(),
            static_dir: self.paths.static_dirs.first().cloned(),
            port,
            open,
            minify: self.build.minify,
            ..Default::default()
        }
    }
}
