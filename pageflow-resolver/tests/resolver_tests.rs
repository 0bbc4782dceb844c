use pageflow_resolver::{Resolution, ResolveOptions, Slug, request_path, resolve_page};
use pageflow_store::mock::{MemorySource, SourceCall};
use pageflow_store::{BackendKind, ContentMode};
use pageflow_types::{ContentId, ContentItem, Page, PageId, Sitemap, SitemapNode};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn options<'a>() -> ResolveOptions<'a> {
    ResolveOptions {
        channel_name: "website",
        language_code: "en-us",
        link_depth: Some(3),
        on_sitemap: None,
    }
}

fn source_with(sitemap: Sitemap, pages: &[i64]) -> MemorySource {
    let mut source = MemorySource::new(BackendKind::LocalMirror, ContentMode::Live)
        .with_sitemap("website", "en-us", sitemap);
    for &id in pages {
        source = source.with_page("en-us", Page::new(PageId::new(id), format!("Template {id}")));
    }
    source
}

// ── Request path ────────────────────────────────────────────────

#[test]
fn request_path_from_slug() {
    assert_eq!(request_path(None), "/");
    assert_eq!(request_path(Some(&Slug::Path("/about".to_string()))), "/about");
    assert_eq!(
        request_path(Some(&Slug::Segments(vec!["blog".into(), "post-1".into()]))),
        "/blog/post-1"
    );
    assert_eq!(request_path(Some(&Slug::Segments(Vec::new()))), "/");
}

#[test]
fn slug_deserializes_from_string_or_list() {
    let flat: Slug = serde_json::from_value(json!("/a")).unwrap();
    let list: Slug = serde_json::from_value(json!(["a", "b"])).unwrap();
    assert_eq!(flat, Slug::Path("/a".to_string()));
    assert_eq!(request_path(Some(&list)), "/a/b");
}

// ── Resolution ──────────────────────────────────────────────────

#[tokio::test]
async fn missing_sitemap_is_not_found() {
    let source = MemorySource::new(BackendKind::Remote, ContentMode::Live);
    let resolution = resolve_page("/", &source, options()).await.unwrap();
    assert!(resolution.is_not_found());
}

#[tokio::test]
async fn unbound_node_skips_item_read() {
    let sitemap = Sitemap::from_nodes([
        SitemapNode::new("/a", PageId::new(1)).with_content(ContentId::new(0)),
    ]);
    let source = source_with(sitemap, &[1]);

    let Resolution::Found(found) = resolve_page("/a", &source, options()).await.unwrap() else {
        panic!("expected a page");
    };

    assert!(found.dynamic_item.is_none());
    assert_eq!(found.template_name, "Template1");
    assert!(!source.calls().iter().any(|c| matches!(c, SourceCall::Item { .. })));
}

#[tokio::test]
async fn bound_node_reads_dynamic_item() {
    let sitemap = Sitemap::from_nodes([
        SitemapNode::new("/posts/a", PageId::new(2)).with_content(ContentId::new(7)),
    ]);
    let source = source_with(sitemap, &[2])
        .with_item("en-us", ContentItem::new(ContentId::new(7), json!({"title": "A"})));

    let resolution = resolve_page("/posts/a", &source, options()).await.unwrap();
    let Resolution::Found(found) = resolution else {
        panic!("expected a page");
    };

    assert_eq!(found.dynamic_item.unwrap().content_id, ContentId::new(7));
    assert_eq!(
        source.calls()[1],
        SourceCall::Page {
            page_id: PageId::new(2),
            locale: "en-us".to_string(),
            link_depth: Some(3),
        }
    );
}

#[tokio::test]
async fn source_failure_propagates() {
    let source = MemorySource::new(BackendKind::Remote, ContentMode::Live).failing("boom");
    assert!(resolve_page("/", &source, options()).await.is_err());
}

// ── Properties ──────────────────────────────────────────────────

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

fn arb_paths() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("/[a-z]{1,6}(/[a-z]{1,6})?", 1..8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn paths_outside_the_sitemap_are_not_found(
        paths in arb_paths(),
        missing in "/[a-z]{1,6}/x[0-9]{1,3}",
    ) {
        prop_assume!(!paths.contains(&missing));
        let sitemap: Sitemap = paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), SitemapNode::new(p.clone(), PageId::new(i as i64 + 1))))
            .collect();
        let ids: Vec<i64> = (1..=paths.len() as i64).collect();
        let source = source_with(sitemap, &ids);

        let resolution = runtime().block_on(resolve_page(&missing, &source, options())).unwrap();
        prop_assert!(resolution.is_not_found());
        prop_assert_eq!(source.calls().len(), 1);
    }

    #[test]
    fn root_is_the_first_key(paths in arb_paths()) {
        let sitemap: Sitemap = paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), SitemapNode::new(p.clone(), PageId::new(i as i64 + 1))))
            .collect();
        let ids: Vec<i64> = (1..=paths.len() as i64).collect();
        let source = source_with(sitemap, &ids);
        let rt = runtime();

        let root = rt.block_on(resolve_page("/", &source, options())).unwrap();
        let first = rt.block_on(resolve_page(&paths[0], &source, options())).unwrap();
        prop_assert_eq!(root, first);
    }
}
