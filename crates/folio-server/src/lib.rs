//! Live server for folio portfolios.
//!
//! Serves the same pages the baker writes, rendered on request, plus the raw
//! asset files under `/portfolio`.

pub mod server;

pub use server::{LiveServer, LiveServerConfig, ServerError};
