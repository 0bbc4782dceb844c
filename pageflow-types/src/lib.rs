//! Core type definitions for pageflow.
//!
//! This crate defines the content model shared by every backend and by the
//! resolution pipeline:
//! - Page and content identifiers
//! - Sitemap nodes and the ordered flat sitemap
//! - Pages, zones and module bindings
//! - Content items and their property block
//!
//! The field payload of a content item is schema-specific and stays an opaque
//! JSON value here.

mod content;
mod ids;
mod page;
mod sitemap;

pub use content::{ContentItem, ContentProperties};
pub use ids::{ContentId, PageId};
pub use page::{MissingComponent, ModuleBinding, Page, sanitize_template_name};
pub use sitemap::{NestedSitemapNode, Redirect, Sitemap, SitemapNode, Visibility};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),
}
