//! Mirror synchronization.
//!
//! A [`MirrorSync`] keeps one local mirror current with a content source.
//! [`SourceSync`] is the full-pull implementation: it walks every sitemap,
//! page and bound content item for its channels and locales and rewrites the
//! matching mirror records.

use crate::error::StoreResult;
use crate::mirror::LocalMirror;
use crate::source::ContentSource;
use async_trait::async_trait;
use pageflow_types::{ContentId, PageId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts of records written by a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub sitemaps: usize,
    pub pages: usize,
    pub items: usize,
}

/// Keeps a local mirror in step with its content source.
#[async_trait]
pub trait MirrorSync: Send + Sync {
    /// Pulls current content into the mirror.
    async fn run_sync(&self) -> StoreResult<SyncReport>;

    /// Removes everything the mirror holds.
    async fn clear_sync(&self) -> StoreResult<()>;
}

/// Builds the sync client responsible for a given mirror.
pub trait SyncFactory: Send + Sync {
    /// A client pulling `channels` into `mirror`.
    fn sync_for(
        &self,
        mirror: &LocalMirror,
        channels: &[String],
    ) -> StoreResult<Arc<dyn MirrorSync>>;
}

/// Full-pull sync from any [`ContentSource`] into a [`LocalMirror`].
pub struct SourceSync {
    source: Arc<dyn ContentSource>,
    mirror: LocalMirror,
    channels: Vec<String>,
    locales: Vec<String>,
}

impl SourceSync {
    pub fn new(
        source: Arc<dyn ContentSource>,
        mirror: LocalMirror,
        channels: Vec<String>,
        locales: Vec<String>,
    ) -> Self {
        Self {
            source,
            mirror,
            channels,
            locales,
        }
    }

    async fn sync_locale(&self, locale: &str, report: &mut SyncReport) -> StoreResult<()> {
        let mut seen_pages: HashSet<PageId> = HashSet::new();
        let mut seen_items: HashSet<ContentId> = HashSet::new();

        for channel in &self.channels {
            let Some(sitemap) = self.source.get_sitemap_flat(channel, locale).await? else {
                warn!("No sitemap for channel {channel} and locale {locale}, skipping");
                continue;
            };
            self.mirror.save_sitemap(channel, locale, &sitemap).await?;
            report.sitemaps += 1;

            for (path, node) in sitemap.iter() {
                if node.is_folder {
                    continue;
                }

                // Dynamic pages share one page document across many paths.
                if seen_pages.insert(node.page_id) {
                    match self.source.get_page(node.page_id, locale, None).await? {
                        Some(page) => {
                            self.mirror.save_page(locale, &page).await?;
                            report.pages += 1;
                        }
                        None => debug!("page {} for {path} not found at source", node.page_id),
                    }
                }

                let Some(content_id) = node.bound_content() else {
                    continue;
                };
                if seen_items.insert(content_id) {
                    if let Some(item) = self.source.get_content_item(content_id, locale).await? {
                        self.mirror.save_content_item(locale, &item).await?;
                        report.items += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MirrorSync for SourceSync {
    async fn run_sync(&self) -> StoreResult<SyncReport> {
        info!(
            "Syncing {} content into {}",
            self.mirror.mode(),
            self.mirror.root().display()
        );
        let mut report = SyncReport::default();
        for locale in &self.locales {
            self.sync_locale(locale, &mut report).await?;
        }
        info!(
            "Sync complete: {} sitemaps, {} pages, {} items",
            report.sitemaps, report.pages, report.items
        );
        Ok(report)
    }

    async fn clear_sync(&self) -> StoreResult<()> {
        self.mirror.clear().await
    }
}
