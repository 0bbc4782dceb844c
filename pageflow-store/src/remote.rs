//! Remote backend: the content API.
//!
//! [`RemoteSource`] shapes each read into an [`ApiCall`] (URL, credential,
//! mode) and decodes the JSON answer. Executing the call is the job of an
//! injected [`ContentApi`] transport.

use crate::error::{StoreError, StoreResult};
use crate::source::{BackendKind, ContentMode, ContentSource};
use async_trait::async_trait;
use pageflow_types::{ContentId, ContentItem, Page, PageId, Sitemap};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

/// Link depth used for pages when the caller does not ask for one.
pub const DEFAULT_CONTENT_LINK_DEPTH: u32 = 3;

/// A single request against the content API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub base_url: String,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Credential sent with the request.
    pub api_key: String,
    pub mode: ContentMode,
}

impl ApiCall {
    /// Full request URL.
    #[must_use]
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.query.is_empty() {
            return format!("{base}{}", self.path);
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{base}{}?{query}", self.path)
    }
}

impl fmt::Debug for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCall")
            .field("url", &self.url())
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Transport that executes [`ApiCall`]s.
///
/// Returns `Ok(None)` for a not-found answer.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn get(&self, call: &ApiCall) -> StoreResult<Option<Value>>;
}

/// Connection settings for the content API.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteOptions {
    pub site_id: String,
    /// Preview key when `mode` is preview, fetch key otherwise.
    pub api_key: String,
    pub mode: ContentMode,
    pub base_url: String,
    pub content_link_depth: u32,
    pub expand_all_content_links: bool,
}

impl RemoteOptions {
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>, mode: ContentMode) -> Self {
        let site_id = site_id.into();
        Self {
            base_url: Self::default_base_url(&site_id),
            site_id,
            api_key: api_key.into(),
            mode,
            content_link_depth: DEFAULT_CONTENT_LINK_DEPTH,
            expand_all_content_links: false,
        }
    }

    /// API host derived from the site identifier.
    #[must_use]
    pub fn default_base_url(site_id: &str) -> String {
        format!("https://{site_id}-api.agilitycms.cloud")
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for RemoteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteOptions")
            .field("site_id", &self.site_id)
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .field("content_link_depth", &self.content_link_depth)
            .field("expand_all_content_links", &self.expand_all_content_links)
            .finish()
    }
}

/// Content source backed by the content API.
pub struct RemoteSource {
    api: Arc<dyn ContentApi>,
    options: RemoteOptions,
}

impl RemoteSource {
    /// Binds a transport to a site and credential.
    ///
    /// Fails when the site identifier or the API key is missing.
    pub fn new(api: Arc<dyn ContentApi>, options: RemoteOptions) -> StoreResult<Self> {
        if options.site_id.trim().is_empty() {
            return Err(StoreError::Unavailable("missing site identifier".to_string()));
        }
        if options.api_key.trim().is_empty() {
            return Err(StoreError::Unavailable(format!(
                "missing {} api key",
                options.mode.api_segment()
            )));
        }
        Ok(Self { api, options })
    }

    #[must_use]
    pub fn options(&self) -> &RemoteOptions {
        &self.options
    }

    fn call(&self, path: String, query: Vec<(String, String)>) -> ApiCall {
        ApiCall {
            base_url: self.options.base_url.clone(),
            path,
            query,
            api_key: self.options.api_key.clone(),
            mode: self.options.mode,
        }
    }

    fn locale_path(&self, locale: &str, rest: &str) -> String {
        format!(
            "/{}/{}/{rest}",
            self.options.mode.api_segment(),
            encode_segment(locale)
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, call: ApiCall) -> StoreResult<Option<T>> {
        debug!("content api request: {}", call.url());
        match self.api.get(&call).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

#[async_trait]
impl ContentSource for RemoteSource {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn mode(&self) -> ContentMode {
        self.options.mode
    }

    async fn get_sitemap_flat(&self, channel: &str, locale: &str) -> StoreResult<Option<Sitemap>> {
        let path = self.locale_path(locale, &format!("sitemap/flat/{}", encode_segment(channel)));
        self.fetch(self.call(path, Vec::new())).await
    }

    async fn get_page(
        &self,
        page_id: PageId,
        locale: &str,
        link_depth: Option<u32>,
    ) -> StoreResult<Option<Page>> {
        let depth = link_depth.unwrap_or(self.options.content_link_depth);
        let path = self.locale_path(locale, &format!("page/{page_id}"));
        let query = vec![
            ("contentLinkDepth".to_string(), depth.to_string()),
            (
                "expandAllContentLinks".to_string(),
                self.options.expand_all_content_links.to_string(),
            ),
        ];
        self.fetch(self.call(path, query)).await
    }

    async fn get_content_item(
        &self,
        content_id: ContentId,
        locale: &str,
    ) -> StoreResult<Option<ContentItem>> {
        let path = self.locale_path(locale, &format!("item/{content_id}"));
        self.fetch(self.call(path, Vec::new())).await
    }
}

fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
