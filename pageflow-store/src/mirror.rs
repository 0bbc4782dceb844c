//! Local mirror backend.
//!
//! Reads and writes JSON records under a per-site, per-mode root directory.
//! The mirror is populated by a [`MirrorSync`](crate::MirrorSync) and read
//! through [`ContentSource`].

use crate::error::{StoreError, StoreResult};
use crate::source::{BackendKind, ContentMode, ContentSource};
use async_trait::async_trait;
use pageflow_types::{ContentId, ContentItem, Page, PageId, Sitemap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, info};

/// Where a site's mirror for one mode lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLocation {
    /// Cache root shared by every site and mode. Holds the build marker.
    pub cache_root: PathBuf,
    /// Site identifier.
    pub site_id: String,
    pub mode: ContentMode,
}

impl MirrorLocation {
    pub fn new(
        cache_root: impl Into<PathBuf>,
        site_id: impl Into<String>,
        mode: ContentMode,
    ) -> Self {
        Self {
            cache_root: cache_root.into(),
            site_id: site_id.into(),
            mode,
        }
    }

    /// `{cacheRoot}/{siteId}/{preview|live}`.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.cache_root.join(&self.site_id).join(self.mode.as_str())
    }
}

/// Record families stored in the mirror.
#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Sitemap,
    Page,
    Item,
}

impl RecordKind {
    const fn dir(self) -> &'static str {
        match self {
            Self::Sitemap => "sitemap",
            Self::Page => "page",
            Self::Item => "item",
        }
    }
}

/// On-disk content mirror for one site and mode.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    root: PathBuf,
    mode: ContentMode,
    incremental: bool,
}

impl LocalMirror {
    /// Opens the mirror at a location.
    ///
    /// `incremental` records whether a completed build already exists, i.e.
    /// whether this mirror is being refreshed rather than built from scratch.
    pub fn open(location: &MirrorLocation, incremental: bool) -> StoreResult<Self> {
        if location.site_id.trim().is_empty() {
            return Err(StoreError::Unavailable("missing site identifier".to_string()));
        }
        segment(&location.site_id)?;
        Ok(Self {
            root: location.root(),
            mode: location.mode,
            incremental,
        })
    }

    /// Opens a mirror rooted directly at `root`.
    pub fn at(root: impl Into<PathBuf>, mode: ContentMode) -> Self {
        Self {
            root: root.into(),
            mode,
            incremental: false,
        }
    }

    /// The mirror root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    fn record_path(&self, locale: &str, kind: RecordKind, key: &str) -> StoreResult<PathBuf> {
        Ok(self
            .root
            .join(segment(locale)?)
            .join(kind.dir())
            .join(format!("{}.json", segment(key)?)))
    }

    async fn read_record<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("mirror record not found: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record<T: Serialize>(&self, path: &Path, value: &T) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(value)?;

        // Readers may be loading the same record; they see the old or the new
        // file, never a partial one.
        let staging = staging_path(path);
        if let Err(e) = write_then_rename(&staging, path, &bytes).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Stores the flat sitemap of a channel.
    pub async fn save_sitemap(
        &self,
        channel: &str,
        locale: &str,
        sitemap: &Sitemap,
    ) -> StoreResult<()> {
        let path = self.record_path(locale, RecordKind::Sitemap, channel)?;
        self.write_record(&path, sitemap).await
    }

    /// Stores a page document.
    pub async fn save_page(&self, locale: &str, page: &Page) -> StoreResult<()> {
        let path = self.record_path(locale, RecordKind::Page, &page.page_id.to_string())?;
        self.write_record(&path, page).await
    }

    /// Stores a content item.
    pub async fn save_content_item(&self, locale: &str, item: &ContentItem) -> StoreResult<()> {
        let path = self.record_path(locale, RecordKind::Item, &item.content_id.to_string())?;
        self.write_record(&path, item).await
    }

    /// Removes the whole mirror. A missing mirror is not an error.
    pub async fn clear(&self) -> StoreResult<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                info!("Cleared content mirror at {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ContentSource for LocalMirror {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalMirror
    }

    fn mode(&self) -> ContentMode {
        self.mode
    }

    async fn get_sitemap_flat(&self, channel: &str, locale: &str) -> StoreResult<Option<Sitemap>> {
        let path = self.record_path(locale, RecordKind::Sitemap, channel)?;
        self.read_record(&path).await
    }

    async fn get_page(
        &self,
        page_id: PageId,
        locale: &str,
        _link_depth: Option<u32>,
    ) -> StoreResult<Option<Page>> {
        // Linked content is already expanded when the mirror is written.
        let path = self.record_path(locale, RecordKind::Page, &page_id.to_string())?;
        self.read_record(&path).await
    }

    async fn get_content_item(
        &self,
        content_id: ContentId,
        locale: &str,
    ) -> StoreResult<Option<ContentItem>> {
        let path = self.record_path(locale, RecordKind::Item, &content_id.to_string())?;
        self.read_record(&path).await
    }
}

async fn write_then_rename(staging: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(staging, bytes).await?;
    fs::rename(staging, path).await
}

/// Unique sibling of `path` for staging a write.
fn staging_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".{}.{n}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Rejects values that would escape or collapse a path segment.
fn segment(value: &str) -> StoreResult<&str> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        Err(StoreError::InvalidKey(value.to_string()))
    } else {
        Ok(value)
    }
}
