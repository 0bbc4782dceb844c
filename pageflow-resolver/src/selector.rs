//! Backend selection.
//!
//! One backend is chosen per resolution call and held for the whole call:
//! - sync disabled or no cache root: the content API, with the credential of
//!   the effective mode
//! - otherwise: the local mirror of the effective mode, refreshed first when
//!   the request is a preview or a completed build already exists
//!
//! With a scratch root configured, the durable cache is copied into it once
//! per selector before the first choice is made.

use crate::config::SiteConfig;
use crate::error::{ResolveError, ResolveResult};
use pageflow_store::{
    ContentApi, ContentMode, ContentSource, LocalMirror, MirrorSync, RemoteSource, SourceSync,
    StoreError, StoreResult, SyncFactory, is_mirror_fresh, is_mirror_usable,
    prepare_scratch_mirror,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Remote read options that vary per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteOverrides {
    pub expand_all_content_links: bool,
}

/// Chooses the content backend for a resolution call.
pub struct BackendSelector {
    config: Arc<SiteConfig>,
    api: Arc<dyn ContentApi>,
    sync: Arc<dyn SyncFactory>,
    scratch: OnceCell<()>,
}

impl BackendSelector {
    pub fn new(
        config: Arc<SiteConfig>,
        api: Arc<dyn ContentApi>,
        sync: Arc<dyn SyncFactory>,
    ) -> Self {
        Self {
            config,
            api,
            sync,
            scratch: OnceCell::new(),
        }
    }

    /// A selector whose mirrors sync from the content API itself.
    pub fn with_remote_sync(config: Arc<SiteConfig>, api: Arc<dyn ContentApi>) -> Self {
        let sync = Arc::new(RemoteSyncFactory::new(Arc::clone(&config), Arc::clone(&api)));
        Self::new(config, api, sync)
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Selects the backend for a request and runs the on-demand sync when
    /// one is due.
    ///
    /// The mirror mode and the credential follow `preview || dev_mode`; the
    /// sync trigger follows the requested `preview` flag. The sync pulls
    /// `channel`, the channel the request reads.
    pub async fn select(
        &self,
        preview: bool,
        dev_mode: bool,
        channel: &str,
        overrides: RemoteOverrides,
    ) -> ResolveResult<Arc<dyn ContentSource>> {
        let effective = preview || dev_mode;
        self.prepare_scratch().await?;
        let Some(mirror) = self.mirror_if_usable(effective)? else {
            return self.remote(effective, overrides);
        };

        if preview || mirror.is_incremental() {
            info!(
                "Sync on-demand {} mode",
                if preview { "preview" } else { "live" }
            );
            let sync = self
                .sync
                .sync_for(&mirror, &[channel.to_string()])
                .map_err(unavailable)?;
            sync.run_sync().await?;
        }

        Ok(Arc::new(mirror))
    }

    /// Same choice as [`select`](Self::select) without ever syncing.
    pub async fn open(
        &self,
        preview: bool,
        dev_mode: bool,
        overrides: RemoteOverrides,
    ) -> ResolveResult<Arc<dyn ContentSource>> {
        let effective = preview || dev_mode;
        self.prepare_scratch().await?;
        match self.mirror_if_usable(effective)? {
            Some(mirror) => Ok(Arc::new(mirror)),
            None => self.remote(effective, overrides),
        }
    }

    /// The content API in a mode, bypassing any mirror.
    pub fn remote(
        &self,
        preview: bool,
        overrides: RemoteOverrides,
    ) -> ResolveResult<Arc<dyn ContentSource>> {
        let mut options = self.config.remote_options(preview);
        options.expand_all_content_links = overrides.expand_all_content_links;
        let source = RemoteSource::new(Arc::clone(&self.api), options).map_err(unavailable)?;
        info!("Using {} content from the remote api", source.mode());
        Ok(Arc::new(source))
    }

    /// Copies the durable cache into the scratch root, at most once.
    ///
    /// Skipped without a scratch root, with sync disabled, or while no
    /// durable cache exists yet.
    async fn prepare_scratch(&self) -> ResolveResult<()> {
        let Some(scratch_root) = &self.config.scratch_root else {
            return Ok(());
        };
        let durable_root = &self.config.cache_root;
        if !self.config.sync_enabled || !is_mirror_usable(durable_root) {
            return Ok(());
        }

        self.scratch
            .get_or_try_init(|| async {
                let outcome = prepare_scratch_mirror(durable_root, scratch_root).await?;
                debug!("Scratch cache at {}: {outcome:?}", scratch_root.display());
                Ok::<(), ResolveError>(())
            })
            .await?;
        Ok(())
    }

    fn mirror_if_usable(&self, preview: bool) -> ResolveResult<Option<LocalMirror>> {
        let cache_root = self.config.active_cache_root();
        if !self.config.sync_enabled {
            info!("Sync disabled, using remote api");
            return Ok(None);
        }
        if !is_mirror_usable(cache_root) {
            warn!(
                "Sync not available at {}, using remote api",
                cache_root.display()
            );
            return Ok(None);
        }

        let incremental = is_mirror_fresh(cache_root);
        let mirror = LocalMirror::open(&self.config.mirror_location(preview), incremental)
            .map_err(unavailable)?;
        info!(
            "Using {} local mirror at {} (incremental: {incremental})",
            mirror.mode(),
            mirror.root().display()
        );
        Ok(Some(mirror))
    }
}

pub(crate) fn unavailable(err: StoreError) -> ResolveError {
    match err {
        StoreError::Unavailable(msg) => ResolveError::BackendUnavailable(msg),
        StoreError::InvalidKey(key) => {
            ResolveError::BackendUnavailable(format!("invalid site identifier: {key}"))
        }
        other => ResolveError::Store(other),
    }
}

/// Builds [`SourceSync`] clients that pull from the content API into a mirror
/// for the requested channels and the configured locales.
pub struct RemoteSyncFactory {
    config: Arc<SiteConfig>,
    api: Arc<dyn ContentApi>,
}

impl RemoteSyncFactory {
    pub fn new(config: Arc<SiteConfig>, api: Arc<dyn ContentApi>) -> Self {
        Self { config, api }
    }
}

impl SyncFactory for RemoteSyncFactory {
    fn sync_for(
        &self,
        mirror: &LocalMirror,
        channels: &[String],
    ) -> StoreResult<Arc<dyn MirrorSync>> {
        let preview = mirror.mode() == ContentMode::Preview;
        let options = self.config.remote_options(preview);
        let source = RemoteSource::new(Arc::clone(&self.api), options)?;
        let sync: Arc<dyn MirrorSync> = Arc::new(SourceSync::new(
            Arc::new(source),
            mirror.clone(),
            channels.to_vec(),
            self.config.locales.clone(),
        ));
        Ok(sync)
    }
}
