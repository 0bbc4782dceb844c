//! Build lifecycle: syncing mirrors before a build, marking it complete,
//! cleaning up and preparing scratch copies.

use crate::config::SiteConfig;
use crate::error::ResolveResult;
use crate::selector::{RemoteSyncFactory, unavailable};
use pageflow_store::{
    ContentApi, LocalMirror, PrepareOutcome, SyncFactory, SyncReport, clear_built,
    is_mirror_fresh, mark_built, prepare_scratch_mirror,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Sync reports of a pre-build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub preview: SyncReport,
    pub live: SyncReport,
}

/// Lifecycle commands around a site build.
pub struct BuildLifecycle {
    config: Arc<SiteConfig>,
    sync: Arc<dyn SyncFactory>,
}

impl BuildLifecycle {
    pub fn new(config: Arc<SiteConfig>, sync: Arc<dyn SyncFactory>) -> Self {
        Self { config, sync }
    }

    /// Lifecycle whose mirrors sync from the content API.
    pub fn with_remote_sync(config: Arc<SiteConfig>, api: Arc<dyn ContentApi>) -> Self {
        let sync = Arc::new(RemoteSyncFactory::new(Arc::clone(&config), api));
        Self::new(config, sync)
    }

    fn mirror(&self, preview: bool) -> ResolveResult<LocalMirror> {
        let incremental = is_mirror_fresh(self.config.active_cache_root());
        LocalMirror::open(&self.config.mirror_location(preview), incremental).map_err(unavailable)
    }

    async fn sync_mirror(&self, preview: bool) -> ResolveResult<SyncReport> {
        let mirror = self.mirror(preview)?;
        let channels = [self.config.channel_name.clone()];
        let sync = self.sync.sync_for(&mirror, &channels).map_err(unavailable)?;
        Ok(sync.run_sync().await?)
    }

    /// Invalidates the build and refreshes the preview mirror.
    pub async fn run_sync(&self) -> ResolveResult<SyncReport> {
        clear_built(self.config.active_cache_root()).await?;
        self.sync_mirror(true).await
    }

    /// Invalidates the build and refreshes the preview, then the live mirror.
    pub async fn pre_build(&self) -> ResolveResult<BuildReport> {
        clear_built(self.config.active_cache_root()).await?;
        let preview = self.sync_mirror(true).await?;
        let live = self.sync_mirror(false).await?;
        Ok(BuildReport { preview, live })
    }

    /// Marks the build complete. Later requests sync incrementally.
    pub async fn post_build(&self) -> ResolveResult<()> {
        mark_built(self.config.active_cache_root()).await?;
        Ok(())
    }

    /// Invalidates the build and removes both mirrors.
    pub async fn clean_sync(&self) -> ResolveResult<()> {
        clear_built(self.config.active_cache_root()).await?;
        for preview in [true, false] {
            self.mirror(preview)?.clear().await?;
        }
        info!("Cleaned content mirrors for site {}", self.config.site_id);
        Ok(())
    }

    /// Copies the durable cache into the scratch root when one is configured.
    ///
    /// Returns `None` without a scratch root.
    pub async fn prepare_scratch(&self) -> ResolveResult<Option<PrepareOutcome>> {
        let Some(scratch_root) = &self.config.scratch_root else {
            warn!("No scratch root configured, nothing to prepare");
            return Ok(None);
        };
        let outcome = prepare_scratch_mirror(&self.config.cache_root, scratch_root).await?;
        Ok(Some(outcome))
    }
}
