//! End-to-end checks against a local stand-in for the schedules API.

use std::time::Duration;

use axum::{extract::Path, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use transit_core::board::CardBoard;
use transit_core::cache::ResponseCache;
use transit_core::config::{ApiConfig, StoreBackend, StoreConfig};
use transit_core::error::FetchError;
use transit_core::fetcher::{fetch_live, Fetcher};
use transit_core::model::{ScheduleDelivery, ScheduleOrigin, StationSelection, DEFAULT_STATION_KEY};
use transit_core::session::{AddOutcome, Session, Startup};
use transit_core::store::{StationStore, StoreKind};

const THREE_MINUTES: &str =
    r#"{"_metadata":{"date":"2024-01-01T00:00:00Z"},"result":{"schedules":[{"message":"3 mn"}]}}"#;

async fn schedules(Path(key): Path<String>) -> (StatusCode, String) {
    match key.trim_start_matches('/') {
        "metros/1/missing/A" => (StatusCode::NOT_FOUND, "{}".to_string()),
        "metros/1/broken/A" => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        _ => (StatusCode::OK, THREE_MINUTES.to_string()),
    }
}

/// Serve the mock API on an ephemeral port and return its base URL.
async fn spawn_api() -> String {
    let app = Router::new().route("/v3/schedules/*key", get(schedules));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v3/schedules", addr)
}

fn api(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: Some(5),
        ..ApiConfig::default()
    }
}

async fn recv(rx: &mut mpsc::Receiver<ScheduleDelivery>) -> ScheduleDelivery {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("no delivery within 10s")
        .expect("channel closed")
}

#[tokio::test]
async fn live_result_is_delivered_and_cached() {
    let base = spawn_api().await;
    let tmp = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(tmp.path().join("responses"));
    let (tx, mut rx) = mpsc::channel(8);
    let fetcher = Fetcher::new(&api(&base), cache.clone(), tx).unwrap();
    let sel = StationSelection::default_station();

    fetcher.fetch(&sel);
    let live = recv(&mut rx).await;
    assert_eq!(live.origin, ScheduleOrigin::Network);
    assert_eq!(live.result.created, "2024-01-01T00:00:00Z");
    assert_eq!(live.result.schedules[0].message, "3 mn");
    assert_eq!(
        cache.lookup(&fetcher.schedule_url(&sel.key)).await.as_deref(),
        Some(THREE_MINUTES)
    );

    fetcher.fetch(&sel);
    let a = recv(&mut rx).await;
    let b = recv(&mut rx).await;
    let mut origins = vec![a.origin, b.origin];
    origins.sort_by_key(|o| o.label());
    assert_eq!(origins, vec![ScheduleOrigin::Cache, ScheduleOrigin::Network]);
    assert_eq!(a.result, b.result);
}

#[tokio::test]
async fn error_status_and_bad_body_fall_back() {
    let base = spawn_api().await;
    let (tx, mut rx) = mpsc::channel(8);
    let fetcher = Fetcher::new(&api(&base), ResponseCache::disabled(), tx).unwrap();

    for key in ["metros/1/missing/A", "metros/1/broken/A"] {
        fetcher.fetch(&StationSelection::new(key, "Somewhere, Direction Elsewhere"));
        let delivery = recv(&mut rx).await;
        assert_eq!(delivery.origin, ScheduleOrigin::Fallback);
        assert_eq!(delivery.result.key, key);
    }
}

#[tokio::test]
async fn fetch_live_reports_why_it_failed() {
    let base = spawn_api().await;
    let client = reqwest::Client::new();

    let missing = fetch_live(&client, &format!("{}/metros/1/missing/A", base)).await;
    assert!(matches!(missing, Err(FetchError::Status(s)) if s == reqwest::StatusCode::NOT_FOUND));

    let broken = fetch_live(&client, &format!("{}/metros/1/broken/A", base)).await;
    assert!(matches!(broken, Err(FetchError::Malformed(_))));

    let (parsed, body) = fetch_live(&client, &format!("{}/metros/1/bastille/A", base))
        .await
        .unwrap();
    assert_eq!(parsed.metadata.date, "2024-01-01T00:00:00Z");
    assert_eq!(body, THREE_MINUTES);
}

#[tokio::test]
async fn first_run_then_add_then_restart() {
    let base = spawn_api().await;
    let tmp = tempfile::tempdir().unwrap();
    let store_config = StoreConfig {
        backend: StoreBackend::Auto,
        dir: tmp.path().to_path_buf(),
    };

    let (tx, mut rx) = mpsc::channel(8);
    let fetcher = Fetcher::new(&api(&base), ResponseCache::disabled(), tx).unwrap();
    let store = StationStore::open(&store_config).await;
    assert_eq!(store.kind(), StoreKind::Structured);
    let mut session = Session::new(store, fetcher, CardBoard::default());

    assert!(matches!(session.bootstrap().await, Startup::Seed(_)));
    let card = session.board().get(DEFAULT_STATION_KEY).unwrap();
    assert_eq!(card.slots[0].as_deref(), Some("0 mn"));

    let delivery = recv(&mut rx).await;
    session.on_delivery(&delivery);
    let card = session.board().get(DEFAULT_STATION_KEY).unwrap();
    assert_eq!(card.slots[0].as_deref(), Some("3 mn"));
    assert_eq!(card.slots[1].as_deref(), Some("2 mn"));
    assert_eq!(card.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));

    let foo = StationSelection::new("metros/1/foo/B", "Foo, Direction Bar");
    assert_eq!(session.add_station(foo.clone()).await, AddOutcome::Added);
    let delivery = recv(&mut rx).await;
    let outcome = session.on_delivery(&delivery);
    assert!(outcome.created);
    let card = session.board().get("metros/1/foo/B").unwrap();
    assert_eq!(card.title, "Foo");
    assert_eq!(card.subtitle, "Direction Bar");

    // Second launch over the same directory restores both stations.
    let (tx, mut rx) = mpsc::channel(8);
    let fetcher = Fetcher::new(&api(&base), ResponseCache::disabled(), tx).unwrap();
    let store = StationStore::open(&store_config).await;
    let mut session = Session::new(store, fetcher, CardBoard::default());

    match session.bootstrap().await {
        Startup::Restore(list) => {
            assert_eq!(list, vec![StationSelection::default_station(), foo]);
        }
        other => panic!("expected restore, got {:?}", other),
    }
    assert!(session.board().is_loading());

    for _ in 0..2 {
        let delivery = recv(&mut rx).await;
        session.on_delivery(&delivery);
    }
    assert!(!session.board().is_loading());
    assert_eq!(session.board().len(), 2);
}
