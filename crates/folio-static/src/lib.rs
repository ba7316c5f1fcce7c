//! Page rendering and static export for folio portfolios.
//!
//! Enumerates every page of the site, renders it, rewrites root-relative
//! links into file-relative ones and writes a self-contained static tree.

pub mod assets;
pub mod baker;
pub mod links;
pub mod renderer;
pub mod route;
pub mod templates;

pub use assets::AssetPipeline;
pub use baker::{BakeConfig, BakeError, BakeReport, OutputArtifact, RouteFailure, SiteBaker};
pub use links::LinkRewriter;
pub use renderer::{PageRenderer, RenderError, SiteRenderer, SiteSettings};
pub use route::{discover_custom_pages, enumerate, Route};
pub use templates::{escape_html, NavLink};
