//! ig-export - Export Instagram posts as Hugo content
//!
//! This library pages through the Instagram Graph media listing for one
//! account and writes a Hugo content file per post, embedding the post with
//! the `instagram` shortcode.

pub mod config;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod paginator;
pub mod service;
pub mod shortcode;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ExportError, FetchError, Result};
pub use service::{run_export, ExportOptions, ExportSummary};
pub use types::{DerivedPost, PageResponse, PostRecord};
