mod common;

use common::*;
use pageflow_resolver::{ContentPipeline, SiteConfig};
use pageflow_store::mock::{MemoryApi, RecordingSyncFactory};
use pageflow_store::{ContentMode, LocalMirror};
use pageflow_types::{PageId, Sitemap, SitemapNode};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn about_sitemap() -> serde_json::Value {
    json!({
        "/": {"pageID": 1},
        "/about": {"pageID": 2, "redirect": "/about-us"}
    })
}

fn pipeline(config: SiteConfig, api: MemoryApi) -> (ContentPipeline, Arc<RecordingSyncFactory>) {
    let factory = Arc::new(RecordingSyncFactory::new());
    let pipeline = ContentPipeline::new(Arc::new(config), Arc::new(api), factory.clone());
    (pipeline, factory)
}

#[tokio::test]
async fn redirects_are_excluded_and_other_locales_prefixed() {
    let api = MemoryApi::new()
        .with_response("/fetch/en-us/sitemap/flat/website", about_sitemap())
        .with_response("/fetch/fr/sitemap/flat/website", about_sitemap());
    let (pipeline, _) = pipeline(remote_config(), api);

    let paths = pipeline.resolve_all_paths(false, false, None, Some("en-us")).await.unwrap();

    assert_eq!(paths, vec!["/", "/fr"]);
}

#[tokio::test]
async fn folders_are_excluded_and_nested_paths_prefixed() {
    let api = MemoryApi::new()
        .with_response("/fetch/en-us/sitemap/flat/website", blog_sitemap())
        .with_response("/fetch/fr/sitemap/flat/website", blog_sitemap());
    let (pipeline, _) = pipeline(remote_config(), api);

    let paths = pipeline.resolve_all_paths(false, false, None, None).await.unwrap();

    assert_eq!(
        paths,
        vec![
            "/home",
            "/posts/hello",
            "/ghost",
            "/fr/home",
            "/fr/posts/hello",
            "/fr/ghost",
        ]
    );
}

#[tokio::test]
async fn locale_without_sitemap_is_skipped() {
    let api = MemoryApi::new().with_response("/fetch/fr/sitemap/flat/website", about_sitemap());
    let (pipeline, _) = pipeline(remote_config(), api);

    let paths = pipeline.resolve_all_paths(false, false, None, None).await.unwrap();

    assert_eq!(paths, vec!["/", "/fr"]);
}

#[tokio::test]
async fn explicit_locales_and_default_are_case_insensitive() {
    let api = MemoryApi::new()
        .with_response("/preview/de/sitemap/flat/website", about_sitemap())
        .with_response("/preview/en-us/sitemap/flat/website", about_sitemap());
    let (pipeline, _) = pipeline(remote_config(), api);
    let locales = vec!["DE".to_string(), "en-US".to_string()];

    let paths = pipeline
        .resolve_all_paths(true, false, Some(&locales), Some("De"))
        .await
        .unwrap();

    assert_eq!(paths, vec!["/", "/en-us"]);
}

#[tokio::test]
async fn mirror_paths_never_sync() {
    let temp = TempDir::new().unwrap();
    let config = mirror_config(temp.path());
    let mirror = LocalMirror::open(&config.mirror_location(false), false).unwrap();
    mirror
        .save_sitemap(
            "website",
            "en-us",
            &Sitemap::from_nodes([
                SitemapNode::new("/home", PageId::new(1)),
                SitemapNode::new("/blog", PageId::new(2)).folder(),
            ]),
        )
        .await
        .unwrap();
    std::fs::write(temp.path().join("build.log"), "BUILT").unwrap();
    let (pipeline, factory) = pipeline(config, MemoryApi::new());

    let paths = pipeline.resolve_all_paths(false, false, None, None).await.unwrap();

    assert_eq!(paths, vec!["/home"]);
    assert_eq!(factory.sync().runs(), 0);
    assert_eq!(mirror.root(), temp.path().join(SITE).join(ContentMode::Live.as_str()));
}

#[tokio::test]
async fn unavailable_backend_gives_no_paths() {
    let config = SiteConfig {
        fetch_api_key: String::new(),
        ..remote_config()
    };
    let (pipeline, _) = pipeline(config, MemoryApi::new().with_response(
        "/fetch/en-us/sitemap/flat/website",
        about_sitemap(),
    ));

    let paths = pipeline.resolve_all_paths(false, false, None, None).await.unwrap();
    assert!(paths.is_empty());
}
