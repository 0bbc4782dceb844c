use pageflow_store::{
    BUILD_MARKER, BUILD_MARKER_CONTENTS, PrepareOutcome, StoreError, clear_built,
    is_mirror_fresh, is_mirror_usable, mark_built, prepare_scratch_mirror,
};
use tempfile::TempDir;

// ── Readiness ───────────────────────────────────────────────────

#[test]
fn missing_root_is_unusable_and_stale() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("absent");
    assert!(!is_mirror_usable(&root));
    assert!(!is_mirror_fresh(&root));
}

#[test]
fn existing_root_without_marker_is_usable_but_stale() {
    let temp = TempDir::new().unwrap();
    assert!(is_mirror_usable(temp.path()));
    assert!(!is_mirror_fresh(temp.path()));
}

#[tokio::test]
async fn marker_makes_root_fresh() {
    let temp = TempDir::new().unwrap();
    mark_built(temp.path()).await.unwrap();

    assert!(is_mirror_fresh(temp.path()));
    let contents = std::fs::read_to_string(temp.path().join(BUILD_MARKER)).unwrap();
    assert_eq!(contents, BUILD_MARKER_CONTENTS);
}

#[tokio::test]
async fn mark_built_creates_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("cache/content");
    mark_built(&root).await.unwrap();
    assert!(is_mirror_usable(&root));
    assert!(is_mirror_fresh(&root));
}

#[tokio::test]
async fn clear_built_is_idempotent() {
    let temp = TempDir::new().unwrap();
    mark_built(temp.path()).await.unwrap();

    clear_built(temp.path()).await.unwrap();
    assert!(!is_mirror_fresh(temp.path()));
    clear_built(temp.path()).await.unwrap();
}

// ── Scratch preparation ─────────────────────────────────────────

fn populate_durable(root: &std::path::Path) {
    std::fs::create_dir_all(root.join("site/live/en-us/page")).unwrap();
    std::fs::write(root.join("site/live/en-us/page/1.json"), b"{}").unwrap();
    std::fs::write(root.join("site/live/en-us/page/2.json"), b"{}").unwrap();
    std::fs::write(root.join(BUILD_MARKER), BUILD_MARKER_CONTENTS).unwrap();
}

#[tokio::test]
async fn prepare_copies_durable_tree() {
    let temp = TempDir::new().unwrap();
    let durable = temp.path().join("durable");
    let scratch = temp.path().join("scratch");
    populate_durable(&durable);

    let outcome = prepare_scratch_mirror(&durable, &scratch).await.unwrap();

    assert_eq!(outcome, PrepareOutcome::Copied { files: 3 });
    assert!(scratch.join("site/live/en-us/page/1.json").exists());
    assert!(is_mirror_fresh(&scratch));
}

#[tokio::test]
async fn prepare_is_noop_once_scratch_is_marked() {
    let temp = TempDir::new().unwrap();
    let durable = temp.path().join("durable");
    let scratch = temp.path().join("scratch");
    populate_durable(&durable);

    prepare_scratch_mirror(&durable, &scratch).await.unwrap();
    std::fs::write(durable.join("site/live/en-us/page/3.json"), b"{}").unwrap();

    let outcome = prepare_scratch_mirror(&durable, &scratch).await.unwrap();
    assert_eq!(outcome, PrepareOutcome::AlreadyPrepared);
    assert!(!scratch.join("site/live/en-us/page/3.json").exists());
}

#[tokio::test]
async fn prepare_recopies_while_durable_is_unbuilt() {
    let temp = TempDir::new().unwrap();
    let durable = temp.path().join("durable");
    let scratch = temp.path().join("scratch");
    std::fs::create_dir_all(durable.join("site")).unwrap();
    std::fs::write(durable.join("site/a.json"), b"{}").unwrap();

    assert_eq!(
        prepare_scratch_mirror(&durable, &scratch).await.unwrap(),
        PrepareOutcome::Copied { files: 1 }
    );
    assert_eq!(
        prepare_scratch_mirror(&durable, &scratch).await.unwrap(),
        PrepareOutcome::Copied { files: 1 }
    );
}

#[tokio::test]
async fn prepare_fails_without_durable_root() {
    let temp = TempDir::new().unwrap();
    let err = prepare_scratch_mirror(&temp.path().join("none"), &temp.path().join("scratch"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn failed_copy_leaves_scratch_unmarked() {
    let temp = TempDir::new().unwrap();
    let durable = temp.path().join("durable");
    let scratch = temp.path().join("scratch");
    populate_durable(&durable);
    let dangling = durable.join("site/live/en-us/page/broken.json");
    std::os::unix::fs::symlink(temp.path().join("missing.json"), &dangling).unwrap();

    let err = prepare_scratch_mirror(&durable, &scratch).await.unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert!(!is_mirror_fresh(&scratch));

    std::fs::remove_file(&dangling).unwrap();
    let outcome = prepare_scratch_mirror(&durable, &scratch).await.unwrap();
    assert_eq!(outcome, PrepareOutcome::Copied { files: 3 });
    assert!(scratch.join("site/live/en-us/page/1.json").exists());
    assert!(is_mirror_fresh(&scratch));
}
