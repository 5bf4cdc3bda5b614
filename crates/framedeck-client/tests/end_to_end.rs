//! Client and server together over real HTTP

use framedeck_client::{
    ClientConfig, ClientError, FrameApi, HttpApi, LoadStatus, Notice, SaveOutcome, Session,
};
use framedeck_model::FrameId;
use framedeck_server::RunningServer;
use framedeck_store::DemoStore;
use framedeck_test_utils::{intro_demo, memory_store_with, UnavailableStore};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::time::Duration;

fn loopback() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

fn client_for(server: &RunningServer) -> HttpApi {
    HttpApi::new(ClientConfig::new(server.base_url()).with_timeout(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn edit_save_and_reload_round_trip() {
    let demo = intro_demo();
    let demo_id = demo.id;
    let (store, shared) = memory_store_with(vec![demo]);
    let server = RunningServer::start(loopback(), shared).unwrap();

    let mut session = Session::new(client_for(&server));
    assert_eq!(session.load().await, &LoadStatus::Loaded);
    assert!(session.open_demo(demo_id));
    assert_eq!(session.editor().editable_content(), Some("<b>1</b>"));

    session.apply(|editor| editor.next_frame().edit_content("<h1>edited</h1>"));
    let frame_id = session.editor().selected_frame().unwrap().id;

    let outcome = session.save().await;
    assert!(matches!(outcome, SaveOutcome::Saved(ref f) if f.id == frame_id));
    assert_eq!(session.editor().notice(), Some(&Notice::Saved { frame_id }));
    assert_eq!(store.frame(frame_id).unwrap().html, "<h1>edited</h1>");

    let reloaded = session.api().list_demos().await.unwrap();
    let frame = reloaded[0].frame(frame_id).unwrap();
    assert_eq!(frame.html, "<h1>edited</h1>");

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_frame_surfaces_not_found() {
    let (store, shared) = memory_store_with(vec![intro_demo()]);
    let server = RunningServer::start(loopback(), shared).unwrap();
    let api = client_for(&server);

    let err = api
        .update_frame_html(FrameId::new(), "x".to_string())
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err:?}");

    let raw = reqwest::Client::new()
        .put(format!("{}/frames/unknown-id", server.base_url()))
        .json(&serde_json::json!({ "html": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status().as_u16(), 404);
    assert_eq!(store.list_demos_with_frames().await.unwrap()[0].frames[0].html, "<b>2</b>");

    server.shutdown().await;
}

#[tokio::test]
async fn storage_outage_fails_load_with_generic_message() {
    let server = RunningServer::start(loopback(), UnavailableStore::shared("disk gone")).unwrap();

    let mut session = Session::new(client_for(&server));
    let status = session.load().await.clone();

    match status {
        LoadStatus::Failed(message) => {
            assert!(message.contains("500"));
            assert!(!message.contains("disk gone"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let server = RunningServer::start(loopback(), memory_store_with(Vec::new()).1).unwrap();
    let api = client_for(&server);
    server.shutdown().await;

    let err = api.list_demos().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
}
