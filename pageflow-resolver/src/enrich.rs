//! Zone and global enrichment walkers.
//!
//! Both walks are strictly sequential: one hook runs at a time, zones in page
//! order and modules in zone order. Later hooks may depend on state an
//! earlier hook left in the shared backend client.

use crate::component::{
    GlobalComponents, GlobalHookContext, ModuleHookContext, ModuleResolver,
};
use crate::error::{HookScope, ResolveError, ResolveResult};
use indexmap::IndexMap;
use pageflow_store::ContentSource;
use pageflow_types::{ContentItem, MissingComponent, ModuleBinding, Page, SitemapNode};
use serde_json::Value;
use tracing::{debug, error, warn};

/// What every hook invocation of one resolution call shares.
#[derive(Clone, Copy)]
pub struct WalkContext<'a> {
    pub source: &'a dyn ContentSource,
    pub language_code: &'a str,
    pub channel_name: &'a str,
    pub sitemap_node: &'a SitemapNode,
    pub dynamic_item: Option<&'a ContentItem>,
    /// Preview or dev mode: unresolved components become placeholders
    /// instead of failing the call.
    pub placeholders: bool,
}

/// Resolves the component of every zone module and attaches hook data.
///
/// Fails on the first hook error, and on the first unresolved component
/// unless `ctx.placeholders` is set.
pub async fn enrich_zones(
    page: Page,
    resolver: &dyn ModuleResolver,
    ctx: WalkContext<'_>,
) -> ResolveResult<Page> {
    let mut zones = IndexMap::with_capacity(page.zones.len());

    for (zone, modules) in &page.zones {
        let mut enriched = Vec::with_capacity(modules.len());
        for binding in modules {
            enriched.push(enrich_module(&page, zone, binding, resolver, ctx).await?);
        }
        zones.insert(zone.clone(), enriched);
    }

    Ok(Page { zones, ..page })
}

async fn enrich_module(
    page: &Page,
    zone: &str,
    binding: &ModuleBinding,
    resolver: &dyn ModuleResolver,
    ctx: WalkContext<'_>,
) -> ResolveResult<ModuleBinding> {
    let mut enriched = binding.clone();

    let Some(component) = resolver.resolve(&binding.module) else {
        if ctx.placeholders {
            warn!("No component for module {} in zone {zone}", binding.module);
            enriched.placeholder = Some(MissingComponent::for_module(&binding.module));
            return Ok(enriched);
        }
        error!("No component for module {} in zone {zone}", binding.module);
        return Err(ResolveError::UnresolvedComponent {
            component: binding.module.clone(),
            zone: zone.to_string(),
        });
    };

    let Some(hook) = component.hook() else {
        return Ok(enriched);
    };

    debug!("Getting custom data for module {} in zone {zone}", binding.module);
    let data = hook
        .custom_data(ModuleHookContext {
            page,
            item: &binding.item,
            source: ctx.source,
            language_code: ctx.language_code,
            channel_name: ctx.channel_name,
            sitemap_node: ctx.sitemap_node,
            dynamic_item: ctx.dynamic_item,
        })
        .await
        .map_err(|source| ResolveError::Enrichment {
            component: binding.module.clone(),
            scope: HookScope::Zone(zone.to_string()),
            source,
        })?;

    if let Some(data) = data.filter(|v| !v.is_null()) {
        enriched.custom_data = Some(data);
    }
    Ok(enriched)
}

/// Runs the hook of every global component, keyed by component name.
///
/// Components without a hook contribute no entry.
pub async fn enrich_globals(
    globals: &GlobalComponents,
    page: &Page,
    ctx: WalkContext<'_>,
) -> ResolveResult<IndexMap<String, Value>> {
    let mut data = IndexMap::new();

    for (name, component) in globals {
        let Some(hook) = component.hook() else {
            continue;
        };

        debug!("Getting global data for {name}");
        let value = hook
            .custom_data(GlobalHookContext {
                page,
                source: ctx.source,
                language_code: ctx.language_code,
                channel_name: ctx.channel_name,
                sitemap_node: ctx.sitemap_node,
                dynamic_item: ctx.dynamic_item,
            })
            .await
            .map_err(|source| ResolveError::Enrichment {
                component: name.clone(),
                scope: HookScope::Global,
                source,
            })?;

        data.insert(name.clone(), value.unwrap_or(Value::Null));
    }

    Ok(data)
}
