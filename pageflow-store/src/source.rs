//! The content source capability.
//!
//! Both backends implement [`ContentSource`], so the resolution pipeline
//! never needs to know which one it is talking to.

use crate::error::StoreResult;
use async_trait::async_trait;
use pageflow_types::{ContentId, ContentItem, NestedSitemapNode, Page, PageId, Sitemap};
use std::fmt;

/// Which backend a source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Pre-synchronized on-disk copy.
    LocalMirror,
    /// Direct content API.
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalMirror => f.write_str("local mirror"),
            Self::Remote => f.write_str("remote api"),
        }
    }
}

/// Whether content is read in preview (unpublished included) or live mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentMode {
    Preview,
    Live,
}

impl ContentMode {
    #[must_use]
    pub const fn from_preview(preview: bool) -> Self {
        if preview { Self::Preview } else { Self::Live }
    }

    #[must_use]
    pub const fn is_preview(&self) -> bool {
        matches!(self, Self::Preview)
    }

    /// Directory name of the mirror for this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Live => "live",
        }
    }

    /// Path segment the content API uses for this mode.
    #[must_use]
    pub const fn api_segment(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Live => "fetch",
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to a site's content.
///
/// Every lookup returns `Ok(None)` when the record does not exist; `Err` is
/// reserved for failures of the backend itself.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Which content mode this source reads.
    fn mode(&self) -> ContentMode;

    /// Flat sitemap for a channel and language, keyed by path.
    async fn get_sitemap_flat(&self, channel: &str, locale: &str) -> StoreResult<Option<Sitemap>>;

    /// Nested sitemap for a channel and language.
    ///
    /// Derived from the flat sitemap unless the backend stores its own tree.
    async fn get_sitemap(
        &self,
        channel: &str,
        locale: &str,
    ) -> StoreResult<Option<Vec<NestedSitemapNode>>> {
        Ok(self
            .get_sitemap_flat(channel, locale)
            .await?
            .map(|sitemap| sitemap.nested()))
    }

    /// A page document. `link_depth` controls how deep linked content is
    /// expanded by backends that support it.
    async fn get_page(
        &self,
        page_id: PageId,
        locale: &str,
        link_depth: Option<u32>,
    ) -> StoreResult<Option<Page>>;

    /// A single content item.
    async fn get_content_item(
        &self,
        content_id: ContentId,
        locale: &str,
    ) -> StoreResult<Option<ContentItem>>;
}
