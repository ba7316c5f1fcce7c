//! Scaffold a new portfolio.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::config_dir;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    scaffold(config_dir(config_path), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Drop your work into portfolio/ and run 'folio dev'.");

    Ok(())
}

/// Create the config file and the default directories under `root`.
///
/// Existing files are kept unless `yes` is set.
fn scaffold(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    for dir in ["portfolio", "custom_pages", "static"] {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    let about = root.join("custom_pages").join("about.md");
    if !about.exists() || yes {
        fs::write(&about, DEFAULT_ABOUT)
            .with_context(|| format!("Failed to write {}", about.display()))?;
        tracing::info!("Created {}", about.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Folio configuration

[site]
title = "My Portfolio"
description = "Selected work"
# Extra stylesheet URLs added after the built-in theme
stylesheets = []

[paths]
# Images, videos, audio and other files, with optional .md captions
portfolio = "portfolio"
# Markdown pages served at /<name>
custom_pages = "custom_pages"
# Copied verbatim into the baked site
static_dirs = ["static"]
# Where 'folio bake' writes the site
output = "bake_output"

[portfolio]
caption_extension = "md"
untitled_label = "Untitled"

[build]
minify = true

# Targets: [home], [gallery], <page>.md or an absolute URL
[[top_link]]
label = "Gallery"
target = "[gallery]"

[[top_link]]
label = "About"
target = "about.md"

[[footer_link]]
label = "Home"
target = "[home]"
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
description: Who made all of this
---

# About

Write something about yourself here.

{{folio-carousel}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_a_loadable_portfolio() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("folio.toml");

        scaffold(temp.path(), &config_path, false).unwrap();

        for dir in ["portfolio", "custom_pages", "static"] {
            assert!(temp.path().join(dir).is_dir(), "{dir}");
        }
        let config = SiteConfig::load(&config_path).unwrap();
        assert_eq!(config.top_link[1].target, "/about");
        assert_eq!(config.footer_link[0].target, "/");
    }

    #[test]
    fn loaded_paths_point_at_scaffolded_dirs() {
        let temp = tempdir().unwrap();
        let site = temp.path().join("site");
        fs::create_dir_all(&site).unwrap();
        let config_path = site.join("folio.toml");

        scaffold(config_dir(&config_path), &config_path, false).unwrap();
        let config = SiteConfig::load(&config_path).unwrap();

        assert!(config.paths.portfolio.is_dir());
        assert!(config.paths.custom_pages.join("about.md").is_file());
        assert_eq!(config.paths.portfolio, site.join("portfolio"));
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("folio.toml");
        fs::write(&config_path, "[site]\ntitle = \"Mine\"\n").unwrap();

        scaffold(temp.path(), &config_path, false).unwrap();
        assert!(fs::read_to_string(&config_path).unwrap().contains("Mine"));

        scaffold(temp.path(), &config_path, true).unwrap();
        assert!(fs::read_to_string(&config_path).unwrap().contains("My Portfolio"));
    }
}
