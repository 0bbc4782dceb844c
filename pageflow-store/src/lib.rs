//! Content sources for pageflow.
//!
//! Two interchangeable backends answer the same read operations:
//! - [`LocalMirror`]: a pre-synchronized on-disk copy of the site's content
//! - [`RemoteSource`]: the content API, reached through an injected transport
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Source**: the [`ContentSource`] capability both backends implement
//! - **Mirror**: file layout and record I/O for the local copy
//! - **Remote**: request shaping and credential selection for the API
//! - **Readiness**: build marker check and scratch-copy preparation
//! - **Sync**: pulling remote content into a mirror
//!
//! ## Mirror Layout
//!
//! ```text
//! {cacheRoot}/build.log                      build complete marker ("BUILT")
//! {cacheRoot}/{siteId}/{preview|live}/       mirror root per mode
//!     {locale}/sitemap/{channel}.json
//!     {locale}/page/{pageId}.json
//!     {locale}/item/{contentId}.json
//! ```

mod error;
mod mirror;
pub mod mock;
mod readiness;
mod remote;
mod source;
mod sync;

pub use error::{StoreError, StoreResult};
pub use mirror::{LocalMirror, MirrorLocation};
pub use readiness::{
    BUILD_MARKER, BUILD_MARKER_CONTENTS, PrepareOutcome, clear_built, is_mirror_fresh,
    is_mirror_usable, mark_built, prepare_scratch_mirror,
};
pub use remote::{ApiCall, ContentApi, DEFAULT_CONTENT_LINK_DEPTH, RemoteOptions, RemoteSource};
pub use source::{BackendKind, ContentMode, ContentSource};
pub use sync::{MirrorSync, SourceSync, SyncFactory, SyncReport};
