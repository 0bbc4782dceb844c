//! Page documents, zones and module bindings.

use crate::content::ContentItem;
use crate::ids::PageId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Strips every character outside `[0-9A-Za-z]` from a raw template name.
#[must_use]
pub fn sanitize_template_name(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Marker attached to a module whose component could not be resolved.
///
/// The rendering layer shows `message` inline in preview/dev mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingComponent {
    pub module: String,
    pub message: String,
}

impl MissingComponent {
    /// Builds the marker for a module name.
    #[must_use]
    pub fn for_module(module: &str) -> Self {
        Self {
            module: module.to_string(),
            message: format!("component for module `{module}` was not found in the module list"),
        }
    }
}

/// A module placed in a zone: component name, content payload and the
/// auxiliary data filled in by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleBinding {
    #[serde(rename = "moduleName", alias = "module")]
    pub module: String,
    pub item: ContentItem,
    #[serde(default)]
    pub custom_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<MissingComponent>,
}

impl ModuleBinding {
    /// Creates a binding with no auxiliary data.
    #[must_use]
    pub fn new(module: impl Into<String>, item: ContentItem) -> Self {
        Self {
            module: module.into(),
            item,
            custom_data: None,
            placeholder: None,
        }
    }

    /// Whether the module was bound to a component that could not be resolved.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.placeholder.is_some()
    }
}

/// A page document.
///
/// Zones keep the order in which the content service lists them; enrichment
/// walks them in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "pageID")]
    pub page_id: PageId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Raw template name. See [`Page::template_key`].
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub zones: IndexMap<String, Vec<ModuleBinding>>,
    /// Remaining page attributes (SEO block, scripts, visibility...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Creates an empty page.
    #[must_use]
    pub fn new(page_id: PageId, template_name: impl Into<String>) -> Self {
        Self {
            page_id,
            name: String::new(),
            title: String::new(),
            template_name: template_name.into(),
            zones: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// Appends a zone.
    #[must_use]
    pub fn with_zone(mut self, name: impl Into<String>, modules: Vec<ModuleBinding>) -> Self {
        self.zones.insert(name.into(), modules);
        self
    }

    /// Template name reduced to an identifier-safe string.
    #[must_use]
    pub fn template_key(&self) -> String {
        sanitize_template_name(&self.template_name)
    }

    /// Iterates all module bindings in zone order, then module order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &ModuleBinding)> {
        self.zones
            .iter()
            .flat_map(|(zone, modules)| modules.iter().map(move |m| (zone.as_str(), m)))
    }
}
