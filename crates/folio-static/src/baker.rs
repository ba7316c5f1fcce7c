//! Static site baker.
//!
//! Renders every route of the site into a directory tree that can be hosted
//! by any static file server, or opened straight from disk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use folio_index::AssetIndex;

use crate::assets::AssetPipeline;
use crate::links::LinkRewriter;
use crate::renderer::{PageRenderer, RenderError};
use crate::route::{enumerate, Route};

/// Configuration for baking a static site.
#[derive(Debug, Clone)]
pub struct BakeConfig {
    /// Asset root, copied to `<output>/portfolio`
    pub asset_dir: PathBuf,

    /// Directories copied verbatim to `<output>/<dir name>`
    pub static_dirs: Vec<PathBuf>,

    /// Minify the built-in stylesheet
    pub minify: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("portfolio"),
            static_dirs: vec![PathBuf::from("static")],
            minify: true,
        }
    }
}

/// A rendered page and where it goes in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Path relative to the output directory
    pub path: PathBuf,

    /// Final HTML, links already rewritten
    pub content: String,
}

/// A route that could not be baked.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub route: Route,
    pub error: String,
}

/// Result of a bake.
#[derive(Debug)]
pub struct BakeReport {
    /// Number of pages written
    pub pages: usize,

    /// Number of files copied from the asset root and static directories
    pub files_copied: usize,

    /// Routes skipped because rendering or writing failed
    pub failures: Vec<RouteFailure>,

    /// Total bake time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BakeReport {
    /// Whether every route was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors that abort a bake.
///
/// Failures of individual routes do not abort; they end up in
/// [`BakeReport::failures`].
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

fn write_error(path: &Path, e: impl ToString) -> BakeError {
    BakeError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Static site baker.
pub struct SiteBaker<R> {
    config: BakeConfig,
    renderer: R,
}

impl<R: PageRenderer> SiteBaker<R> {
    /// Create a new baker around a page renderer.
    pub fn new(config: BakeConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    /// Bake the whole site into `output_dir`.
    pub fn bake(
        &self,
        index: &AssetIndex,
        custom_pages: &[String],
        output_dir: &Path,
    ) -> Result<BakeReport, BakeError> {
        let start = Instant::now();

        fs::create_dir_all(output_dir).map_err(|e| write_error(output_dir, e))?;

        let files_copied = self.copy_static_files(output_dir)?;
        self.write_builtin_assets(output_dir)?;

        let routes = enumerate(index, custom_pages);

        // Create every parent directory up front; the parallel writes below
        // then only touch disjoint files.
        let parents: BTreeSet<PathBuf> = routes
            .iter()
            .filter_map(|route| route.output_path().parent().map(|p| output_dir.join(p)))
            .collect();
        for parent in &parents {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }

        let failures: Vec<RouteFailure> = routes
            .par_iter()
            .filter_map(|route| self.bake_route(route, output_dir).err())
            .collect();

        for failure in &failures {
            tracing::warn!("Skipped {}: {}", failure.route, failure.error);
        }

        let report = BakeReport {
            pages: routes.len() - failures.len(),
            files_copied,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: output_dir.to_path_buf(),
        };

        tracing::info!(
            "Baked {} of {} pages and copied {} files in {}ms",
            report.pages,
            routes.len(),
            report.files_copied,
            report.duration_ms
        );

        Ok(report)
    }

    /// Render a route and rewrite its links for its place in the tree.
    pub fn render_route(&self, route: &Route) -> Result<OutputArtifact, RenderError> {
        let html = self.renderer.render(route)?;
        let content = LinkRewriter::at_depth(route.depth())
            .rewrite(&html)
            .into_owned();

        Ok(OutputArtifact {
            path: route.output_path(),
            content,
        })
    }

    fn bake_route(&self, route: &Route, output_dir: &Path) -> Result<(), RouteFailure> {
        let failure = |error: String| RouteFailure {
            route: route.clone(),
            error,
        };

        let artifact = self.render_route(route).map_err(|e| failure(e.to_string()))?;

        let destination = output_dir.join(&artifact.path);
        fs::write(&destination, artifact.content)
            .map_err(|e| failure(format!("{}: {}", destination.display(), e)))?;

        tracing::debug!("Wrote {}", destination.display());
        Ok(())
    }

    /// Copy the asset root and static directories into the output tree.
    fn copy_static_files(&self, output_dir: &Path) -> Result<usize, BakeError> {
        let mut copied = 0;

        if self.config.asset_dir.is_dir() {
            copied += copy_dir(&self.config.asset_dir, &output_dir.join("portfolio"), output_dir)?;
        } else {
            tracing::warn!("Asset directory not found: {}", self.config.asset_dir.display());
        }

        for dir in &self.config.static_dirs {
            let Some(name) = dir.file_name() else {
                tracing::warn!("Skipping static directory without a name: {}", dir.display());
                continue;
            };
            if !dir.is_dir() {
                tracing::warn!("Static directory not found: {}", dir.display());
                continue;
            }
            copied += copy_dir(dir, &output_dir.join(name), output_dir)?;
        }

        Ok(copied)
    }

    fn write_builtin_assets(&self, output_dir: &Path) -> Result<(), BakeError> {
        let assets_dir = output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| write_error(&assets_dir, e))?;

        let css_path = assets_dir.join(AssetPipeline::CSS_FILE);
        fs::write(&css_path, AssetPipeline::css(self.config.minify))
            .map_err(|e| write_error(&css_path, e))?;

        let js_path = assets_dir.join(AssetPipeline::JS_FILE);
        fs::write(&js_path, AssetPipeline::js()).map_err(|e| write_error(&js_path, e))?;

        Ok(())
    }
}

/// Copy `source` recursively into `target`, skipping `exclude` (the output
/// directory, when it sits inside the source).
fn copy_dir(source: &Path, target: &Path, exclude: &Path) -> Result<usize, BakeError> {
    let mut copied = 0;
    let exclude = exclude.canonicalize().ok();

    let walker = WalkDir::new(source).follow_links(true).into_iter().filter_entry(|e| {
        match (&exclude, e.path().canonicalize()) {
            (Some(exclude), Ok(path)) => path != *exclude,
            _ => true,
        }
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(BakeError::ReadError {
                    path: source.display().to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).map_err(|e| write_error(&destination, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &destination).map_err(|e| write_error(&destination, e))?;
            copied += 1;
        }
    }

    tracing::debug!("Copied {} files from {}", copied, source.display());
    Ok(copied)
}
