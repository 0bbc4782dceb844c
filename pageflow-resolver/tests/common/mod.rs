//! Shared fixtures for resolver tests.

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use pageflow_resolver::{
    ComponentRegistry, GlobalDataHook, GlobalHookContext, ModuleComponent, ModuleDataHook,
    ModuleHookContext, SiteConfig,
};
use pageflow_store::mock::MemoryApi;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const SITE: &str = "site-1";
pub const BASE_URL: &str = "https://api.test";

/// Config reading straight from the content API.
pub fn remote_config() -> SiteConfig {
    SiteConfig {
        site_id: SITE.to_string(),
        fetch_api_key: "fetch-key".to_string(),
        preview_api_key: "preview-key".to_string(),
        locales: vec!["en-us".to_string(), "fr".to_string()],
        security_key: "secret".to_string(),
        sync_enabled: false,
        api_base_url: Some(BASE_URL.to_string()),
        ..SiteConfig::default()
    }
}

/// Config using a mirror under `cache_root`.
pub fn mirror_config(cache_root: &Path) -> SiteConfig {
    SiteConfig {
        sync_enabled: true,
        cache_root: cache_root.to_path_buf(),
        ..remote_config()
    }
}

pub fn blog_sitemap() -> Value {
    json!({
        "/home": {"pageID": 1, "title": "Home"},
        "/posts": {"pageID": 0, "isFolder": true},
        "/posts/hello": {"pageID": 2, "contentID": 20},
        "/old": {"pageID": 3, "redirect": {"url": "/home"}},
        "/ghost": {"pageID": 9}
    })
}

pub fn home_page() -> Value {
    json!({
        "pageID": 1,
        "name": "home",
        "title": "Home",
        "templateName": "Main Template",
        "zones": {
            "MainContentZone": [
                {"module": "RichText", "item": {"contentID": 101, "fields": {"html": "<p>hi</p>"}}},
                {"module": "PostsListing", "item": {"contentID": 102, "fields": {}}}
            ],
            "Sidebar": [
                {"module": "Subscribe", "item": {"contentID": 103, "fields": {}}}
            ]
        }
    })
}

pub fn post_page() -> Value {
    json!({
        "pageID": 2,
        "templateName": "Post-Details",
        "zones": {
            "MainContentZone": [
                {"module": "PostDetails", "item": {"contentID": 104, "fields": {}}}
            ]
        }
    })
}

pub fn post_item() -> Value {
    json!({
        "contentID": 20,
        "properties": {"definitionName": "Post", "referenceName": "posts"},
        "fields": {"title": "Hello"}
    })
}

/// Content API answering the blog fixture for `locale` in both modes.
pub fn blog_api_for(locale: &str) -> MemoryApi {
    let mut api = MemoryApi::new();
    for segment in ["fetch", "preview"] {
        api = api
            .with_response(&format!("/{segment}/{locale}/sitemap/flat/website"), blog_sitemap())
            .with_response(&format!("/{segment}/{locale}/page/1"), home_page())
            .with_response(&format!("/{segment}/{locale}/page/2"), post_page())
            .with_response(&format!("/{segment}/{locale}/item/20"), post_item());
    }
    api
}

pub fn blog_api() -> MemoryApi {
    blog_api_for("en-us")
}

/// Shared invocation log.
pub type HookLog = Arc<Mutex<Vec<String>>>;

pub fn hook_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &HookLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Records its label on every call and answers with `{"from": label}`.
pub struct RecordingHook {
    pub label: String,
    pub log: HookLog,
}

impl RecordingHook {
    pub fn new(label: &str, log: &HookLog) -> Self {
        Self {
            label: label.to_string(),
            log: Arc::clone(log),
        }
    }
}

#[async_trait]
impl ModuleDataHook for RecordingHook {
    async fn custom_data(&self, ctx: ModuleHookContext<'_>) -> anyhow::Result<Option<Value>> {
        // Yield so that any interleaving would show up in the log.
        tokio::task::yield_now().await;
        self.log.lock().unwrap().push(self.label.clone());
        Ok(Some(json!({
            "from": self.label,
            "item": ctx.item.content_id,
            "language": ctx.language_code,
            "channel": ctx.channel_name,
        })))
    }
}

#[async_trait]
impl GlobalDataHook for RecordingHook {
    async fn custom_data(&self, ctx: GlobalHookContext<'_>) -> anyhow::Result<Option<Value>> {
        self.log.lock().unwrap().push(self.label.clone());
        Ok(Some(json!({"from": self.label, "page": ctx.page.page_id})))
    }
}

/// Always fails.
pub struct FailingHook;

#[async_trait]
impl ModuleDataHook for FailingHook {
    async fn custom_data(&self, _ctx: ModuleHookContext<'_>) -> anyhow::Result<Option<Value>> {
        Err(anyhow!("listing service down"))
    }
}

#[async_trait]
impl GlobalDataHook for FailingHook {
    async fn custom_data(&self, _ctx: GlobalHookContext<'_>) -> anyhow::Result<Option<Value>> {
        Err(anyhow!("menu service down"))
    }
}

/// Registry with a recording hook on every blog module except `RichText`,
/// which has none.
pub fn blog_registry(log: &HookLog) -> ComponentRegistry {
    ComponentRegistry::new()
        .with("RichText", ModuleComponent::plain())
        .with("PostsListing", ModuleComponent::with_hook(RecordingHook::new("m2", log)))
        .with("Subscribe", ModuleComponent::with_hook(RecordingHook::new("m3", log)))
        .with("PostDetails", ModuleComponent::with_hook(RecordingHook::new("details", log)))
}
