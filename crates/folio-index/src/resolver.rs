//! Asset type classification and caption resolution.

use std::fs;
use std::path::PathBuf;

use crate::element::{AssetElement, AssetType};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "avif", "tif", "tiff",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "ogv", "m4v"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aac", "m4a", "opus"];

/// Classify an extension (without the dot, any case).
pub fn classify(extension: &str) -> AssetType {
    let ext = extension.to_ascii_lowercase();
    let ext = ext.as_str();

    if IMAGE_EXTENSIONS.contains(&ext) {
        AssetType::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        AssetType::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        AssetType::Audio
    } else {
        AssetType::Unsupported
    }
}

/// Settings for caption lookup.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extension of caption documents, without the dot
    pub caption_extension: String,

    /// Title used when a file name humanizes to nothing
    pub untitled_label: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            caption_extension: "md".to_string(),
            untitled_label: "Untitled".to_string(),
        }
    }
}

/// Resolves types, captions and display titles of assets.
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    config: ResolverConfig,
}

impl ContentResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn classify(&self, extension: &str) -> AssetType {
        classify(extension)
    }

    /// Path of the caption document sitting next to the asset.
    pub fn caption_path(&self, element: &AssetElement) -> PathBuf {
        element
            .path()
            .with_extension(&self.config.caption_extension)
    }

    /// Caption document contents, if the sibling document exists.
    pub fn caption_text(&self, element: &AssetElement) -> Option<String> {
        let path = self.caption_path(element);
        if !path.is_file() {
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to read caption {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Caption of an asset: the sibling document, or the default title.
    pub fn resolve_caption(&self, element: &AssetElement) -> String {
        self.caption_text(element)
            .unwrap_or_else(|| self.default_title(element))
    }

    /// Human-readable title derived from the file name.
    pub fn default_title(&self, element: &AssetElement) -> String {
        let title = humanize(element.stem());
        if title.is_empty() {
            self.config.untitled_label.clone()
        } else {
            title
        }
    }
}

/// Turn `my_best-photo` into `My Best Photo`.
pub fn humanize(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_every_table_entry_in_any_case() {
        let tables = [
            (IMAGE_EXTENSIONS, AssetType::Image),
            (VIDEO_EXTENSIONS, AssetType::Video),
            (AUDIO_EXTENSIONS, AssetType::Audio),
        ];

        for (extensions, expected) in tables {
            for ext in extensions {
                assert_eq!(classify(ext), expected, "{ext}");
                assert_eq!(classify(&ext.to_uppercase()), expected, "{ext}");
            }
        }
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        for ext in ["", "pdf", "txt", "md", "psd", "jpg2", "mp"] {
            assert_eq!(classify(ext), AssetType::Unsupported, "{ext}");
        }
    }

    #[test]
    fn tables_do_not_overlap() {
        for ext in IMAGE_EXTENSIONS {
            assert!(!VIDEO_EXTENSIONS.contains(ext) && !AUDIO_EXTENSIONS.contains(ext));
        }
        for ext in VIDEO_EXTENSIONS {
            assert!(!AUDIO_EXTENSIONS.contains(ext));
        }
    }

    #[test]
    fn reads_sibling_caption() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("dawn.jpg");
        fs::write(&asset, b"jpg").unwrap();
        fs::write(temp.path().join("dawn.md"), "Early *light*.").unwrap();

        let element = AssetElement::new(asset, "dawn.jpg".to_string());
        let resolver = ContentResolver::default();

        assert_eq!(resolver.resolve_caption(&element), "Early *light*.");
    }

    #[test]
    fn falls_back_to_humanized_name() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("old_harbor-at_night.png");
        fs::write(&asset, b"png").unwrap();

        let element = AssetElement::new(asset, "old_harbor-at_night.png".to_string());
        let resolver = ContentResolver::default();

        assert_eq!(resolver.resolve_caption(&element), "Old Harbor At Night");
    }

    #[test]
    fn empty_name_uses_untitled_label() {
        let element = AssetElement::new(PathBuf::from("/nowhere/___.jpg"), "___.jpg".to_string());
        let resolver = ContentResolver::new(ResolverConfig {
            untitled_label: "Sans titre".to_string(),
            ..Default::default()
        });

        assert_eq!(resolver.default_title(&element), "Sans titre");
    }

    #[test]
    fn honors_custom_caption_extension() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("song.mp3");
        fs::write(&asset, b"mp3").unwrap();
        fs::write(temp.path().join("song.txt"), "liner notes").unwrap();
        fs::write(temp.path().join("song.md"), "ignored").unwrap();

        let element = AssetElement::new(asset, "song.mp3".to_string());
        let resolver = ContentResolver::new(ResolverConfig {
            caption_extension: "txt".to_string(),
            ..Default::default()
        });

        assert_eq!(resolver.resolve_caption(&element), "liner notes");
    }
}
