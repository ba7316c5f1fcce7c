//! A single portfolio asset.

use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::resolver::classify;

/// Characters that cannot appear raw in a URL path segment. `#` and `?`
/// would otherwise start a fragment or query, `%` an escape.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode each `/`-separated segment of `path`.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Media type of an asset, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Video,
    Audio,
    Unsupported,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered portfolio asset.
///
/// Elements are only created while building an [`AssetIndex`](crate::AssetIndex)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetElement {
    #[serde(skip)]
    path: PathBuf,
    identifier: String,
    relative_path: String,
    extension: String,
    asset_type: AssetType,
}

impl AssetElement {
    /// Build an element from its absolute path and its `/`-separated path
    /// relative to the asset root.
    pub(crate) fn new(path: PathBuf, relative_path: String) -> Self {
        let file_name = relative_path.rsplit('/').next().unwrap_or(&relative_path);

        // Dotfiles are skipped by the scanner, so a leading dot is never an
        // extension separator here.
        let (identifier, extension) = match file_name.rfind('.') {
            Some(dot) if dot > 0 => {
                let cut = relative_path.len() - (file_name.len() - dot);
                (
                    relative_path[..cut].to_string(),
                    file_name[dot + 1..].to_lowercase(),
                )
            }
            _ => (relative_path.clone(), String::new()),
        };

        let asset_type = classify(&extension);

        Self {
            path,
            identifier,
            relative_path,
            extension,
            asset_type,
        }
    }

    /// Absolute path of the asset file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Relative path without extension; the unique key of the element.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Relative path with extension, `/`-separated.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Lower-cased extension without the dot. Empty when the file has none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Last segment of the identifier, e.g. `sunset` for `travel/sunset`.
    pub fn stem(&self) -> &str {
        self.identifier
            .rsplit('/')
            .next()
            .unwrap_or(&self.identifier)
    }

    /// URL path of the page rendered for this element, percent-encoded.
    pub fn page_url(&self) -> String {
        format!("/portfolio/{}", encode_path(&self.identifier))
    }

    /// URL path of the raw asset file, percent-encoded.
    pub fn file_url(&self) -> String {
        format!("/portfolio/{}", encode_path(&self.relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(relative: &str) -> AssetElement {
        AssetElement::new(PathBuf::from("/root").join(relative), relative.to_string())
    }

    #[test]
    fn strips_extension_from_identifier() {
        let e = element("travel/sunset.JPG");

        assert_eq!(e.identifier(), "travel/sunset");
        assert_eq!(e.extension(), "jpg");
        assert_eq!(e.relative_path(), "travel/sunset.JPG");
        assert_eq!(e.asset_type(), AssetType::Image);
        assert_eq!(e.stem(), "sunset");
    }

    #[test]
    fn only_last_extension_is_stripped() {
        let e = element("archive.tar.gz");

        assert_eq!(e.identifier(), "archive.tar");
        assert_eq!(e.extension(), "gz");
        assert_eq!(e.asset_type(), AssetType::Unsupported);
    }

    #[test]
    fn dot_in_directory_is_not_an_extension() {
        let e = element("v1.2/readme");

        assert_eq!(e.identifier(), "v1.2/readme");
        assert_eq!(e.extension(), "");
    }

    #[test]
    fn builds_urls() {
        let e = element("a/clip.mp4");

        assert_eq!(e.page_url(), "/portfolio/a/clip");
        assert_eq!(e.file_url(), "/portfolio/a/clip.mp4");
        assert_eq!(e.asset_type().to_string(), "video");
    }

    #[test]
    fn encodes_reserved_characters_in_urls() {
        let e = element("best of/shot#1?100%.jpg");

        assert_eq!(e.identifier(), "best of/shot#1?100%");
        assert_eq!(e.page_url(), "/portfolio/best%20of/shot%231%3F100%25");
        assert_eq!(e.file_url(), "/portfolio/best%20of/shot%231%3F100%25.jpg");
    }

    #[test]
    fn keeps_dots_and_dashes_in_urls() {
        let e = element("my_trip-2024/day.one.webp");

        assert_eq!(e.file_url(), "/portfolio/my_trip-2024/day.one.webp");
    }
}
