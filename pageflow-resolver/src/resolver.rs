//! Sitemap and page resolution.

use crate::error::ResolveResult;
use pageflow_store::ContentSource;
use pageflow_types::{ContentItem, Page, Sitemap, SitemapNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Called with every sitemap fetched during resolution.
pub type SitemapCallback = Arc<dyn Fn(&Sitemap) + Send + Sync>;

/// The route parameter a page was requested with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slug {
    /// A ready-made path.
    Path(String),
    /// Path segments, joined with `/`.
    Segments(Vec<String>),
}

/// Request path for a slug. No slug is the home page.
#[must_use]
pub fn request_path(slug: Option<&Slug>) -> String {
    match slug {
        None => "/".to_string(),
        Some(Slug::Path(path)) => path.clone(),
        Some(Slug::Segments(segments)) if segments.is_empty() => "/".to_string(),
        Some(Slug::Segments(segments)) => segments.iter().map(|s| format!("/{s}")).collect(),
    }
}

/// A page found in the sitemap, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub sitemap_node: SitemapNode,
    pub page: Page,
    pub dynamic_item: Option<ContentItem>,
    /// Template name with everything outside `[0-9A-Za-z]` stripped.
    pub template_name: String,
}

/// Outcome of [`resolve_page`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Box<ResolvedPage>),
    NotFound,
}

impl Resolution {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Per-call read options.
#[derive(Clone, Copy)]
pub struct ResolveOptions<'a> {
    pub channel_name: &'a str,
    pub language_code: &'a str,
    /// Link depth for the page read. `None` leaves it to the backend.
    pub link_depth: Option<u32>,
    pub on_sitemap: Option<&'a SitemapCallback>,
}

/// Resolves `path` to its sitemap node, page and dynamic item.
///
/// `/` resolves to the first sitemap entry. A path missing from the sitemap,
/// a missing sitemap and a page missing from the backend all give
/// [`Resolution::NotFound`].
pub async fn resolve_page(
    path: &str,
    source: &dyn ContentSource,
    options: ResolveOptions<'_>,
) -> ResolveResult<Resolution> {
    let ResolveOptions {
        channel_name,
        language_code,
        link_depth,
        on_sitemap,
    } = options;

    let Some(sitemap) = source.get_sitemap_flat(channel_name, language_code).await? else {
        warn!("No sitemap found for channel {channel_name} and locale {language_code}");
        return Ok(Resolution::NotFound);
    };
    if let Some(callback) = on_sitemap {
        callback(&sitemap);
    }

    let Some((key, node)) = sitemap.lookup_entry(path) else {
        warn!("page [{path}] not found in sitemap");
        return Ok(Resolution::NotFound);
    };
    let mut node = node.clone();
    if node.path.is_empty() {
        node.path = key.to_string();
    }

    let Some(page) = source.get_page(node.page_id, language_code, link_depth).await? else {
        warn!("page [{path}] not found in page store");
        return Ok(Resolution::NotFound);
    };

    let dynamic_item = match node.bound_content() {
        Some(content_id) => {
            let item = source.get_content_item(content_id, language_code).await?;
            if item.is_none() {
                debug!("dynamic item {content_id} for [{path}] not found");
            }
            item
        }
        None => None,
    };

    let template_name = page.template_key();
    Ok(Resolution::Found(Box::new(ResolvedPage {
        sitemap_node: node,
        page,
        dynamic_item,
        template_name,
    })))
}

/// Routable paths of one locale's sitemap, prefixed with `/{locale}` unless
/// it is the default locale. The prefixed root is `/{locale}`.
pub(crate) fn locale_paths(
    sitemap: &Sitemap,
    language_code: &str,
    default_locale: &str,
) -> Vec<String> {
    let paths = sitemap.routable_paths();
    if language_code.eq_ignore_ascii_case(default_locale) {
        return paths.map(str::to_string).collect();
    }
    paths
        .map(|path| match path {
            "/" => format!("/{language_code}"),
            _ => format!("/{language_code}{path}"),
        })
        .collect()
}
