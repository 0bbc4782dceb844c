//! Rendering components and their custom data hooks.
//!
//! A zone module names a component. The [`ModuleResolver`] maps that name to
//! a [`ModuleComponent`], which may carry a hook that fetches extra data at
//! resolution time. Site-wide components (header, footer...) are passed as a
//! named [`GlobalComponents`] map and follow the same hook contract.

use async_trait::async_trait;
use indexmap::IndexMap;
use pageflow_store::ContentSource;
use pageflow_types::{ContentItem, Page, SitemapNode};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arguments handed to a module's data hook.
#[derive(Clone, Copy)]
pub struct ModuleHookContext<'a> {
    pub page: &'a Page,
    /// The module's own content item.
    pub item: &'a ContentItem,
    /// The backend answering this resolution call.
    pub source: &'a dyn ContentSource,
    pub language_code: &'a str,
    pub channel_name: &'a str,
    pub sitemap_node: &'a SitemapNode,
    pub dynamic_item: Option<&'a ContentItem>,
}

/// Arguments handed to a global component's data hook.
#[derive(Clone, Copy)]
pub struct GlobalHookContext<'a> {
    pub page: &'a Page,
    pub source: &'a dyn ContentSource,
    pub language_code: &'a str,
    pub channel_name: &'a str,
    pub sitemap_node: &'a SitemapNode,
    pub dynamic_item: Option<&'a ContentItem>,
}

/// Custom data hook of a zone module component.
///
/// `Ok(None)` attaches no data.
#[async_trait]
pub trait ModuleDataHook: Send + Sync {
    async fn custom_data(&self, ctx: ModuleHookContext<'_>) -> anyhow::Result<Option<Value>>;
}

/// Custom data hook of a global component.
#[async_trait]
pub trait GlobalDataHook: Send + Sync {
    async fn custom_data(&self, ctx: GlobalHookContext<'_>) -> anyhow::Result<Option<Value>>;
}

/// A zone module component.
#[derive(Clone, Default)]
pub struct ModuleComponent {
    hook: Option<Arc<dyn ModuleDataHook>>,
}

impl ModuleComponent {
    /// A component that renders its content item as is.
    #[must_use]
    pub fn plain() -> Self {
        Self { hook: None }
    }

    /// A component with a custom data hook.
    pub fn with_hook(hook: impl ModuleDataHook + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    #[must_use]
    pub fn hook(&self) -> Option<&Arc<dyn ModuleDataHook>> {
        self.hook.as_ref()
    }
}

impl fmt::Debug for ModuleComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleComponent")
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

/// A site-wide component.
#[derive(Clone, Default)]
pub struct GlobalComponent {
    hook: Option<Arc<dyn GlobalDataHook>>,
}

impl GlobalComponent {
    #[must_use]
    pub fn plain() -> Self {
        Self { hook: None }
    }

    pub fn with_hook(hook: impl GlobalDataHook + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    #[must_use]
    pub fn hook(&self) -> Option<&Arc<dyn GlobalDataHook>> {
        self.hook.as_ref()
    }
}

impl fmt::Debug for GlobalComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalComponent")
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

/// Site-wide components by key, walked in insertion order.
pub type GlobalComponents = IndexMap<String, GlobalComponent>;

/// Maps module names to components.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, module: &str) -> Option<ModuleComponent>;
}

/// A [`ModuleResolver`] backed by a name table.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ModuleComponent>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component under a module name, replacing any previous one.
    #[must_use]
    pub fn with(mut self, module: impl Into<String>, component: ModuleComponent) -> Self {
        self.register(module, component);
        self
    }

    pub fn register(&mut self, module: impl Into<String>, component: ModuleComponent) {
        self.components.insert(module.into(), component);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ModuleResolver for ComponentRegistry {
    fn resolve(&self, module: &str) -> Option<ModuleComponent> {
        self.components.get(module).cloned()
    }
}
