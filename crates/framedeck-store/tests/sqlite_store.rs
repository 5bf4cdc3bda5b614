//! SqliteStore Tests
//!
//! Exercise the storage contract against a real database file.

use framedeck_model::{DemoSeed, FrameId};
use framedeck_store::{DemoStore, PoolConfig, SqliteStore, StoreError};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("demos.db"), PoolConfig::default()).unwrap();
    (dir, store)
}

fn intro_seed() -> DemoSeed {
    DemoSeed::new("Intro")
        .with_frame(2, "<b>2</b>")
        .with_frame(1, "<b>1</b>")
}

#[tokio::test]
async fn test_list_returns_demos_with_their_frames() {
    let (_dir, store) = open_store();
    let intro = store.create_demo(intro_seed()).await.unwrap();
    let other = store
        .create_demo(DemoSeed::new("Other").with_frame(1, "<p>o</p>"))
        .await
        .unwrap();

    let demos = store.list_demos_with_frames().await.unwrap();

    assert_eq!(demos.len(), 2);
    assert_eq!(demos[0], intro);
    assert_eq!(demos[1], other);
    assert!(demos[0].frames.iter().all(|f| f.demo_id == intro.id));
}

#[tokio::test]
async fn test_sorted_frames_match_persisted_orders() {
    let (_dir, store) = open_store();
    store
        .create_demo(
            DemoSeed::new("Ties")
                .with_frame(3, "c")
                .with_frame(1, "a1")
                .with_frame(1, "a2")
                .with_frame(2, "b"),
        )
        .await
        .unwrap();

    let demo = store.list_demos_with_frames().await.unwrap().remove(0).sorted();

    let orders: Vec<i32> = demo.frames.iter().map(|f| f.order).collect();
    let html: Vec<&str> = demo.frames.iter().map(|f| f.html.as_str()).collect();
    assert_eq!(orders, vec![1, 1, 2, 3]);
    assert_eq!(html, vec!["a1", "a2", "b", "c"]);
}

#[tokio::test]
async fn test_update_then_list_round_trip() {
    let (_dir, store) = open_store();
    let demo = store.create_demo(intro_seed()).await.unwrap();
    let frame = &demo.frames[0];

    let updated = store
        .update_frame_html(frame.id, "<i>new</i>".to_string())
        .await
        .unwrap();

    assert_eq!(updated.id, frame.id);
    assert_eq!(updated.html, "<i>new</i>");
    assert_eq!(updated.order, frame.order);
    assert!(updated.updated_at >= frame.updated_at);

    let listed = store.list_demos_with_frames().await.unwrap();
    assert_eq!(listed[0].frame(frame.id).unwrap().html, "<i>new</i>");
}

#[tokio::test]
async fn test_update_twice_is_idempotent() {
    let (_dir, store) = open_store();
    let demo = store.create_demo(intro_seed()).await.unwrap();
    let id = demo.frames[1].id;

    let first = store.update_frame_html(id, "same".to_string()).await.unwrap();
    let second = store.update_frame_html(id, "same".to_string()).await.unwrap();

    assert_eq!(first.html, second.html);
}

#[tokio::test]
async fn test_update_unknown_frame_leaves_storage_unchanged() {
    let (_dir, store) = open_store();
    store.create_demo(intro_seed()).await.unwrap();
    let before = store.list_demos_with_frames().await.unwrap();

    let result = store.update_frame_html(FrameId::new(), "x".to_string()).await;

    assert!(matches!(result, Err(StoreError::FrameNotFound(_))));
    assert_eq!(store.list_demos_with_frames().await.unwrap(), before);
}

#[tokio::test]
async fn test_delete_cascades_to_frames() {
    let (_dir, store) = open_store();
    let demo = store.create_demo(intro_seed()).await.unwrap();
    let frame_id = demo.frames[0].id;

    store.delete_demo(demo.id).await.unwrap();

    assert!(store.list_demos_with_frames().await.unwrap().is_empty());
    let orphan = store.update_frame_html(frame_id, "x".to_string()).await;
    assert!(matches!(orphan, Err(StoreError::FrameNotFound(_))));
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let (_dir, store) = open_store();

    let result = store.create_demo(DemoSeed::new("")).await;

    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
    assert!(store.list_demos_with_frames().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("durable.db");

    let demo = {
        let store = SqliteStore::open(&path, PoolConfig::default()).unwrap();
        let demo = store.create_demo(intro_seed()).await.unwrap();
        store
            .update_frame_html(demo.frames[0].id, "kept".to_string())
            .await
            .unwrap();
        demo
    };

    let reopened = SqliteStore::open(&path, PoolConfig::default()).unwrap();
    let listed = reopened.list_demos_with_frames().await.unwrap();
    assert_eq!(listed[0].frame(demo.frames[0].id).unwrap().html, "kept");
}

#[tokio::test]
async fn test_connections_return_to_pool_after_failures() {
    let (_dir, store) = open_store();

    for _ in 0..10 {
        let _ = store.update_frame_html(FrameId::new(), "x".to_string()).await;
    }

    let stats = store.pool().stats();
    assert_eq!(stats.in_use, 0);
    assert!(stats.total_created <= store.pool().config().max_size + 1);
    store.ping().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_share_bounded_pool() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        SqliteStore::open(dir.path().join("busy.db"), PoolConfig::new().with_max_size(2)).unwrap(),
    );
    let demo = store.create_demo(intro_seed()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        let id = demo.frames[i % 2].id;
        handles.push(tokio::spawn(async move {
            store.update_frame_html(id, format!("v{i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.pool().stats().in_use, 0);
    assert!(store.pool().stats().total_created <= 3);
}
