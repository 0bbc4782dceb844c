//! The page props handed to the rendering layer.

use indexmap::IndexMap;
use pageflow_types::{ContentItem, ModuleBinding, Page, SitemapNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of resolving one page.
///
/// When `not_found` is set, none of the content fields are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPageResult {
    pub sitemap_node: Option<SitemapNode>,
    pub page: Option<Page>,
    #[serde(rename = "dynamicPageItem")]
    pub dynamic_item: Option<ContentItem>,
    /// Sanitized template name.
    #[serde(rename = "pageTemplateName")]
    pub template_name: Option<String>,
    /// Hook data of the global components, by component key.
    pub global_data: IndexMap<String, Value>,
    pub language_code: String,
    pub channel_name: String,
    #[serde(rename = "isPreview")]
    pub preview: bool,
    #[serde(rename = "isDevelopmentMode")]
    pub dev_mode: bool,
    pub not_found: bool,
}

impl ResolvedPageResult {
    /// A not-found result carrying only the request context.
    #[must_use]
    pub fn not_found(
        language_code: String,
        channel_name: String,
        preview: bool,
        dev_mode: bool,
    ) -> Self {
        Self {
            sitemap_node: None,
            page: None,
            dynamic_item: None,
            template_name: None,
            global_data: IndexMap::new(),
            language_code,
            channel_name,
            preview,
            dev_mode,
            not_found: true,
        }
    }

    /// Iterates every module binding of the resolved page in zone order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &ModuleBinding)> {
        self.page.iter().flat_map(|page| page.modules())
    }
}
