//! Asset discovery and the ordered index.
//!
//! The scan is deterministic: candidates are sorted by their `/`-separated
//! relative path before they are inserted, so the index order and the
//! outcome of identifier collisions never depend on directory listing order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::element::AssetElement;
use crate::resolver::ResolverConfig;

/// Extensions of caption documents and notes; never indexed as assets.
///
/// The configured caption extension is reserved in addition to these.
pub const RESERVED_EXTENSIONS: &[&str] = &["md", "txt"];

/// Errors raised while scanning the asset root.
///
/// [`AssetIndex::build`] logs these and degrades to an empty index;
/// [`AssetIndex::try_build`] returns them.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Asset directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read asset directory {path}: {message}")]
    ReadError { path: String, message: String },
}

/// Two files mapped to the same identifier; the later one was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub identifier: String,
    pub kept: PathBuf,
    pub dropped: PathBuf,
}

/// Ordered, immutable collection of portfolio assets.
#[derive(Debug, Default)]
pub struct AssetIndex {
    root: PathBuf,
    elements: Vec<AssetElement>,
    positions: HashMap<String, usize>,
    collisions: Vec<Collision>,
}

impl AssetIndex {
    /// Scan `root` and build the index with the default caption extension.
    ///
    /// A missing or unreadable root yields an empty index; the failure is logged.
    pub fn build(root: impl AsRef<Path>) -> Self {
        Self::build_with(root, &ResolverConfig::default())
    }

    /// Scan `root`, never indexing documents with the configured caption extension.
    ///
    /// A missing or unreadable root yields an empty index; the failure is logged.
    pub fn build_with(root: impl AsRef<Path>, config: &ResolverConfig) -> Self {
        let root = root.as_ref();
        match Self::try_build_with(root, config) {
            Ok(index) => index,
            Err(e) => {
                tracing::error!("{}", e);
                Self {
                    root: root.to_path_buf(),
                    ..Default::default()
                }
            }
        }
    }

    /// Scan `root` and build the index, returning scan failures.
    pub fn try_build(root: impl AsRef<Path>) -> Result<Self, IndexError> {
        Self::try_build_with(root, &ResolverConfig::default())
    }

    /// [`try_build`](Self::try_build) with an explicit caption extension.
    pub fn try_build_with(root: impl AsRef<Path>, config: &ResolverConfig) -> Result<Self, IndexError> {
        let start = Instant::now();
        let root = root.as_ref();

        if !root.is_dir() {
            return Err(IndexError::DirectoryNotFound(root.display().to_string()));
        }

        let mut candidates = discover(root, &config.caption_extension)?;
        candidates.sort_by(|a, b| a.1.cmp(&b.1));

        // Classification is independent per file; indexed collect keeps the sorted order.
        let built: Vec<AssetElement> = candidates
            .into_par_iter()
            .map(|(path, relative)| AssetElement::new(path, relative))
            .collect();

        let mut index = Self {
            root: root.to_path_buf(),
            ..Default::default()
        };

        for element in built {
            index.insert(element);
        }

        tracing::info!(
            "Indexed {} assets from {} in {}ms",
            index.elements.len(),
            root.display(),
            start.elapsed().as_millis()
        );

        Ok(index)
    }

    /// Append an element, dropping it when its identifier is already taken.
    fn insert(&mut self, element: AssetElement) {
        if let Some(&existing) = self.positions.get(element.identifier()) {
            let kept = &self.elements[existing];
            tracing::warn!(
                "Multiple assets share the identifier '{}': keeping {}, dropping {}",
                element.identifier(),
                kept.path().display(),
                element.path().display()
            );
            self.collisions.push(Collision {
                identifier: element.identifier().to_string(),
                kept: kept.path().to_path_buf(),
                dropped: element.path().to_path_buf(),
            });
            return;
        }

        tracing::debug!("Including asset: {}", element.relative_path());
        self.positions
            .insert(element.identifier().to_string(), self.elements.len());
        self.elements.push(element);
    }

    /// Asset root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All elements in index order.
    pub fn elements(&self) -> &[AssetElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Identifier collisions detected during the build.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Look up an element by identifier.
    pub fn get(&self, identifier: &str) -> Option<&AssetElement> {
        self.positions
            .get(identifier)
            .map(|&position| &self.elements[position])
    }

    /// Element preceding `element` in index order.
    pub fn before(&self, element: &AssetElement) -> Option<&AssetElement> {
        let position = self.position_of(element)?;
        position
            .checked_sub(1)
            .map(|previous| &self.elements[previous])
    }

    /// Element following `element` in index order.
    pub fn after(&self, element: &AssetElement) -> Option<&AssetElement> {
        let position = self.position_of(element)?;
        self.elements.get(position + 1)
    }

    fn position_of(&self, element: &AssetElement) -> Option<usize> {
        let position = self
            .positions
            .get(element.identifier())
            .copied()
            .filter(|&p| self.elements[p] == *element);

        if position.is_none() {
            tracing::warn!(
                "Navigation requested for an asset outside the index: {}",
                element.path().display()
            );
        }

        position
    }
}

/// Walk `root` and collect `(absolute path, relative path)` for every asset candidate.
fn discover(root: &Path, caption_extension: &str) -> Result<Vec<(PathBuf, String)>, IndexError> {
    let mut candidates = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(IndexError::ReadError {
                    path: root.display().to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        if RESERVED_EXTENSIONS.contains(&ext.as_str()) || ext.eq_ignore_ascii_case(caption_extension) {
            tracing::debug!("Skipping caption document: {}", path.display());
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        candidates.push((path.to_path_buf(), relative));
    }

    Ok(candidates)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}
