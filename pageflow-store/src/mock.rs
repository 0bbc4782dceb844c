//! In-memory test doubles.

use crate::error::{StoreError, StoreResult};
use crate::mirror::LocalMirror;
use crate::remote::{ApiCall, ContentApi};
use crate::source::{BackendKind, ContentMode, ContentSource};
use crate::sync::{MirrorSync, SyncFactory, SyncReport};
use async_trait::async_trait;
use pageflow_types::{ContentId, ContentItem, Page, PageId, Sitemap};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A read observed by [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Sitemap { channel: String, locale: String },
    Page { page_id: PageId, locale: String, link_depth: Option<u32> },
    Item { content_id: ContentId, locale: String },
}

/// A content source holding its records in memory and recording every read.
pub struct MemorySource {
    kind: BackendKind,
    mode: ContentMode,
    sitemaps: HashMap<(String, String), Sitemap>,
    pages: HashMap<(PageId, String), Page>,
    items: HashMap<(ContentId, String), ContentItem>,
    failure: Option<String>,
    calls: Mutex<Vec<SourceCall>>,
}

impl MemorySource {
    /// Creates an empty source reporting itself as `kind`.
    pub fn new(kind: BackendKind, mode: ContentMode) -> Self {
        Self {
            kind,
            mode,
            sitemaps: HashMap::new(),
            pages: HashMap::new(),
            items: HashMap::new(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sitemap(mut self, channel: &str, locale: &str, sitemap: Sitemap) -> Self {
        self.sitemaps.insert((channel.to_string(), locale.to_string()), sitemap);
        self
    }

    pub fn with_page(mut self, locale: &str, page: Page) -> Self {
        self.pages.insert((page.page_id, locale.to_string()), page);
        self
    }

    pub fn with_item(mut self, locale: &str, item: ContentItem) -> Self {
        self.items.insert((item.content_id, locale.to_string()), item);
        self
    }

    /// Makes every read fail with an API error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Reads observed so far, in order.
    pub fn calls(&self) -> Vec<SourceCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: SourceCall) -> StoreResult<()> {
        lock(&self.calls).push(call);
        match &self.failure {
            Some(message) => Err(StoreError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn mode(&self) -> ContentMode {
        self.mode
    }

    async fn get_sitemap_flat(&self, channel: &str, locale: &str) -> StoreResult<Option<Sitemap>> {
        self.record(SourceCall::Sitemap {
            channel: channel.to_string(),
            locale: locale.to_string(),
        })?;
        Ok(self
            .sitemaps
            .get(&(channel.to_string(), locale.to_string()))
            .cloned())
    }

    async fn get_page(
        &self,
        page_id: PageId,
        locale: &str,
        link_depth: Option<u32>,
    ) -> StoreResult<Option<Page>> {
        self.record(SourceCall::Page {
            page_id,
            locale: locale.to_string(),
            link_depth,
        })?;
        Ok(self.pages.get(&(page_id, locale.to_string())).cloned())
    }

    async fn get_content_item(
        &self,
        content_id: ContentId,
        locale: &str,
    ) -> StoreResult<Option<ContentItem>> {
        self.record(SourceCall::Item {
            content_id,
            locale: locale.to_string(),
        })?;
        Ok(self.items.get(&(content_id, locale.to_string())).cloned())
    }
}

/// A content API transport answering from a path → JSON table.
#[derive(Default)]
pub struct MemoryApi {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the answer for a request path (query excluded).
    pub fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ContentApi for MemoryApi {
    async fn get(&self, call: &ApiCall) -> StoreResult<Option<Value>> {
        lock(&self.calls).push(call.clone());
        Ok(self.responses.get(&call.path).cloned())
    }
}

/// A sync client that only counts how often it ran.
#[derive(Default)]
pub struct RecordingSync {
    runs: AtomicUsize,
    clears: AtomicUsize,
}

impl RecordingSync {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MirrorSync for RecordingSync {
    async fn run_sync(&self) -> StoreResult<SyncReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(SyncReport::default())
    }

    async fn clear_sync(&self) -> StoreResult<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one shared [`RecordingSync`] and remembers which mirrors asked.
#[derive(Default)]
pub struct RecordingSyncFactory {
    sync: Arc<RecordingSync>,
    roots: Mutex<Vec<PathBuf>>,
    channels: Mutex<Vec<Vec<String>>>,
}

impl RecordingSyncFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared sync client.
    pub fn sync(&self) -> Arc<RecordingSync> {
        Arc::clone(&self.sync)
    }

    /// Mirror roots a sync client was requested for, in order.
    pub fn roots(&self) -> Vec<PathBuf> {
        lock(&self.roots).clone()
    }

    /// Channels of each request, in order.
    pub fn channels(&self) -> Vec<Vec<String>> {
        lock(&self.channels).clone()
    }
}

impl SyncFactory for RecordingSyncFactory {
    fn sync_for(
        &self,
        mirror: &LocalMirror,
        channels: &[String],
    ) -> StoreResult<Arc<dyn MirrorSync>> {
        lock(&self.roots).push(mirror.root().to_path_buf());
        lock(&self.channels).push(channels.to_vec());
        let sync: Arc<dyn MirrorSync> = self.sync.clone();
        Ok(sync)
    }
}
