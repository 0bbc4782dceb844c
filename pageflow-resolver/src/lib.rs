//! Content resolution pipeline for pageflow.
//!
//! Turns a requested page path into fully hydrated page props:
//! 1. Select a backend (local mirror or content API) and sync it on demand
//! 2. Look the path up in the sitemap, fetch the page and its dynamic item
//! 3. Walk the zones and global components, attaching hook data
//!
//! # Example
//!
//! ```ignore
//! let pipeline = ContentPipeline::with_remote_sync(config, api);
//! let props = pipeline
//!     .resolve_page_props(&PageRequest::new("/posts/hello"), &registry, &globals)
//!     .await?;
//! ```

mod component;
mod config;
mod enrich;
mod error;
mod lifecycle;
mod pipeline;
mod props;
mod resolver;
mod selector;

pub use component::{
    ComponentRegistry, GlobalComponent, GlobalComponents, GlobalDataHook, GlobalHookContext,
    ModuleComponent, ModuleDataHook, ModuleHookContext, ModuleResolver,
};
pub use config::{
    DEFAULT_CACHE_ROOT, DEFAULT_CHANNEL, DEFAULT_LOCALE, ENV_API_BASE_URL, ENV_API_FETCH_KEY,
    ENV_API_PREVIEW_KEY, ENV_CACHE_ROOT, ENV_DEBUG, ENV_GUID, ENV_LOCALES, ENV_SCRATCH_ROOT,
    ENV_SECURITY_KEY, ENV_SITEMAP, ENV_SYNC, SiteConfig,
};
pub use enrich::{WalkContext, enrich_globals, enrich_zones};
pub use error::{HookScope, ResolveError, ResolveResult};
pub use lifecycle::{BuildLifecycle, BuildReport};
pub use pipeline::{ApiOptions, ContentPipeline, PageRequest};
pub use props::ResolvedPageResult;
pub use resolver::{
    Resolution, ResolveOptions, ResolvedPage, SitemapCallback, Slug, request_path, resolve_page,
};
pub use selector::{BackendSelector, RemoteOverrides, RemoteSyncFactory};
