//! Portfolio asset index.
//!
//! Scans an asset root into an ordered, uniquely identified list of
//! [`AssetElement`]s and resolves their types and captions.

pub mod element;
pub mod index;
pub mod resolver;

pub use element::{AssetElement, AssetType};
pub use index::{AssetIndex, Collision, IndexError, RESERVED_EXTENSIONS};
pub use resolver::{classify, ContentResolver, ResolverConfig};
