//! Resolution entry points.

use crate::component::{GlobalComponents, ModuleResolver};
use crate::config::SiteConfig;
use crate::enrich::{WalkContext, enrich_globals, enrich_zones};
use crate::error::ResolveResult;
use crate::props::ResolvedPageResult;
use crate::resolver::{
    ResolveOptions, Resolution, ResolvedPage, SitemapCallback, Slug, locale_paths, request_path,
    resolve_page,
};
use crate::selector::{BackendSelector, RemoteOverrides};
use pageflow_preview::{PreviewToken, PreviewValidation, generate_token, validate};
use pageflow_store::{ContentApi, DEFAULT_CONTENT_LINK_DEPTH, SyncFactory};
use pageflow_types::ContentId;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Content API read options for one request.
#[derive(Clone)]
pub struct ApiOptions {
    pub content_link_depth: u32,
    pub expand_all_content_links: bool,
    /// Observes the sitemap the page was resolved against.
    pub on_sitemap_retrieved: Option<SitemapCallback>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            content_link_depth: DEFAULT_CONTENT_LINK_DEPTH,
            expand_all_content_links: false,
            on_sitemap_retrieved: None,
        }
    }
}

impl fmt::Debug for ApiOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiOptions")
            .field("content_link_depth", &self.content_link_depth)
            .field("expand_all_content_links", &self.expand_all_content_links)
            .field("on_sitemap_retrieved", &self.on_sitemap_retrieved.is_some())
            .finish()
    }
}

/// One page request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub path: String,
    pub locale: Option<String>,
    pub default_locale: Option<String>,
    pub preview: bool,
    pub dev_mode: bool,
    /// Per-request channel override.
    pub channel: Option<String>,
    pub api_options: ApiOptions,
}

impl PageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// A request for the page a route slug points at.
    #[must_use]
    pub fn from_slug(slug: Option<&Slug>) -> Self {
        Self::new(request_path(slug))
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn with_api_options(mut self, api_options: ApiOptions) -> Self {
        self.api_options = api_options;
        self
    }
}

/// The content resolution pipeline for one site.
pub struct ContentPipeline {
    config: Arc<SiteConfig>,
    selector: BackendSelector,
}

impl ContentPipeline {
    pub fn new(
        config: Arc<SiteConfig>,
        api: Arc<dyn ContentApi>,
        sync: Arc<dyn SyncFactory>,
    ) -> Self {
        let selector = BackendSelector::new(Arc::clone(&config), api, sync);
        Self { config, selector }
    }

    /// A pipeline whose mirrors sync from the content API itself.
    pub fn with_remote_sync(config: Arc<SiteConfig>, api: Arc<dyn ContentApi>) -> Self {
        let selector = BackendSelector::with_remote_sync(Arc::clone(&config), api);
        Self { config, selector }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Resolves a request into page props.
    ///
    /// Missing content and an unavailable backend give a not-found result.
    /// Hook failures, unresolved components outside preview/dev mode and
    /// store failures are errors.
    pub async fn resolve_page_props(
        &self,
        request: &PageRequest,
        modules: &dyn ModuleResolver,
        globals: &GlobalComponents,
    ) -> ResolveResult<ResolvedPageResult> {
        let language_code = self
            .config
            .language_code(request.locale.as_deref(), request.default_locale.as_deref());
        let channel_name = self.config.channel(request.channel.as_deref()).to_string();
        let effective_preview = request.preview || request.dev_mode;
        let not_found = || {
            ResolvedPageResult::not_found(
                language_code.clone(),
                channel_name.clone(),
                effective_preview,
                request.dev_mode,
            )
        };

        let overrides = RemoteOverrides {
            expand_all_content_links: request.api_options.expand_all_content_links,
        };
        let source = match self
            .selector
            .select(request.preview, request.dev_mode, &channel_name, overrides)
            .await
        {
            Ok(source) => source,
            Err(e) if e.is_backend_unavailable() => {
                error!("Content backend could not be accessed: {e}");
                return Ok(not_found());
            }
            Err(e) => return Err(e),
        };

        let options = ResolveOptions {
            channel_name: &channel_name,
            language_code: &language_code,
            link_depth: Some(request.api_options.content_link_depth),
            on_sitemap: request.api_options.on_sitemap_retrieved.as_ref(),
        };
        let resolution = resolve_page(&request.path, source.as_ref(), options).await?;
        let Resolution::Found(found) = resolution else {
            return Ok(not_found());
        };
        let ResolvedPage {
            sitemap_node,
            page,
            dynamic_item,
            template_name,
        } = *found;

        let ctx = WalkContext {
            source: source.as_ref(),
            language_code: &language_code,
            channel_name: &channel_name,
            sitemap_node: &sitemap_node,
            dynamic_item: dynamic_item.as_ref(),
            placeholders: effective_preview,
        };
        let page = enrich_zones(page, modules, ctx).await?;
        let global_data = enrich_globals(globals, &page, ctx).await?;

        Ok(ResolvedPageResult {
            sitemap_node: Some(sitemap_node),
            page: Some(page),
            dynamic_item,
            template_name: Some(template_name),
            global_data,
            language_code,
            channel_name,
            preview: effective_preview,
            dev_mode: request.dev_mode,
            not_found: false,
        })
    }

    /// Every routable path across `locales` (the configured locales when
    /// `None`). Paths of non-default locales are prefixed with `/{locale}`.
    ///
    /// Never syncs. An unavailable backend gives an empty list.
    pub async fn resolve_all_paths(
        &self,
        preview: bool,
        dev_mode: bool,
        locales: Option<&[String]>,
        default_locale: Option<&str>,
    ) -> ResolveResult<Vec<String>> {
        let default_locale = default_locale
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.config.default_locale())
            .to_lowercase();
        let locales = locales.unwrap_or(&self.config.locales);
        let channel_name = &self.config.channel_name;

        let source = match self
            .selector
            .open(preview, dev_mode, RemoteOverrides::default())
            .await
        {
            Ok(source) => source,
            Err(e) if e.is_backend_unavailable() => {
                error!("Content backend could not be accessed: {e}");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut paths = Vec::new();
        for locale in locales {
            let language_code = locale.to_lowercase();
            let Some(sitemap) = source.get_sitemap_flat(channel_name, &language_code).await? else {
                warn!(
                    "No sitemap found for locale {language_code}, \
                     check the configured locales and channel"
                );
                continue;
            };
            paths.extend(locale_paths(&sitemap, &language_code, &default_locale));
        }
        Ok(paths)
    }

    /// Checks a supplied preview token against the site security key.
    #[must_use]
    pub fn validate_preview_token(&self, supplied: Option<&str>) -> PreviewValidation {
        validate(supplied, &self.config.security_key)
    }

    /// The preview token for the site security key.
    #[must_use]
    pub fn generate_preview_token(&self) -> PreviewToken {
        generate_token(&self.config.security_key)
    }

    /// Path of the first sitemap node of the default locale bound to
    /// `content_id`, read from the content API.
    pub async fn dynamic_page_path(
        &self,
        content_id: ContentId,
        preview: bool,
    ) -> ResolveResult<Option<String>> {
        info!("Retrieving dynamic page path for content {content_id}");
        let source = self.selector.remote(preview, RemoteOverrides::default())?;
        let sitemap = source
            .get_sitemap_flat(&self.config.channel_name, self.config.default_locale())
            .await?;
        Ok(sitemap.and_then(|s| s.path_for_content(content_id).map(str::to_string)))
    }
}
