//! End-to-end engine tests against an in-process fixture host that
//! implements the contents API (with revision-marker discipline) and
//! the public mirror.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tempfile::TempDir;

use gigsync::{
    Banner, ContentStore, DocKey, Event, FooterSite, MirrorClient, Poster, PosterPage,
    RemoteConfig, RepoClient, SyncEngine,
};

// ----------------------------------------------------------------------
// Fixture host
// ----------------------------------------------------------------------

#[derive(Debug, Clone)]
struct StoredFile {
    value: Value,
    sha: String,
}

#[derive(Default)]
struct FixtureState {
    /// Repository files, keyed by repo-relative path.
    files: Mutex<HashMap<String, StoredFile>>,
    /// Mirror documents, keyed by file name.
    mirror: Mutex<HashMap<String, Value>>,
    /// Mirror file names that answer 500.
    mirror_failures: Mutex<HashSet<String>>,
    sha_counter: AtomicU64,
    /// PUTs that targeted an existing path without its current sha.
    stale_puts: AtomicUsize,
    puts: AtomicUsize,
}

impl FixtureState {
    fn next_sha(&self) -> String {
        format!("sha-{}", self.sha_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn seed_file(&self, path: &str, value: Value) -> String {
        let sha = self.next_sha();
        self.files.lock().unwrap().insert(
            path.to_string(),
            StoredFile {
                value,
                sha: sha.clone(),
            },
        );
        sha
    }

    fn file(&self, path: &str) -> Option<StoredFile> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn seed_mirror(&self, name: &str, value: Value) {
        self.mirror.lock().unwrap().insert(name.to_string(), value);
    }

    fn fail_mirror(&self, name: &str) {
        self.mirror_failures.lock().unwrap().insert(name.to_string());
    }
}

fn fold_base64(bytes: &[u8]) -> String {
    let encoded = BASE64.encode(bytes);
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn get_contents(
    State(state): State<Arc<FixtureState>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Response {
    match state.file(&path) {
        Some(file) => {
            let body = serde_json::to_vec_pretty(&file.value).unwrap();
            Json(json!({
                "content": fold_base64(&body),
                "sha": file.sha,
            }))
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Not Found"})),
        )
            .into_response(),
    }
}

async fn put_contents(
    State(state): State<Arc<FixtureState>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer "))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Requires authentication"})),
        )
            .into_response();
    }

    state.puts.fetch_add(1, Ordering::SeqCst);

    let provided_sha = body.get("sha").and_then(|s| s.as_str());
    if let Some(existing) = state.file(&path) {
        if provided_sha != Some(existing.sha.as_str()) {
            state.stale_puts.fetch_add(1, Ordering::SeqCst);
            return (
                StatusCode::CONFLICT,
                Json(json!({"message": format!("{} does not match {}", path, existing.sha)})),
            )
                .into_response();
        }
    }

    let encoded: String = body
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let decoded = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "content is not valid base64"})),
            )
                .into_response();
        }
    };
    let value: Value = match serde_json::from_slice(&decoded) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "content is not valid JSON"})),
            )
                .into_response();
        }
    };

    let sha = state.seed_file(&path, value);
    (StatusCode::OK, Json(json!({"content": {"sha": sha}}))).into_response()
}

async fn get_mirror(
    State(state): State<Arc<FixtureState>>,
    Path(name): Path<String>,
) -> Response {
    if state.mirror_failures.lock().unwrap().contains(&name) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "mirror exploded".to_string(),
        )
            .into_response();
    }
    match state.mirror.lock().unwrap().get(&name) {
        Some(value) => Json(value.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not found".to_string()).into_response(),
    }
}

async fn spawn_fixture() -> (Arc<FixtureState>, String) {
    let state = Arc::new(FixtureState::default());
    let app = Router::new()
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(get_contents).put(put_contents),
        )
        .route("/mirror/{name}", get(get_mirror))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, format!("http://{}", addr))
}

fn remote_config(base: &str) -> RemoteConfig {
    RemoteConfig {
        owner: "emanonent".to_string(),
        repo: "livegigs-site".to_string(),
        branch: "main".to_string(),
        content_dir: "content".to_string(),
        api_base: base.to_string(),
        public_base: Some(format!("{}/mirror", base)),
        token: None,
    }
}

fn engine_at(base: &str, data_dir: &std::path::Path, token: Option<&str>) -> SyncEngine {
    let remote = remote_config(base);
    let store = ContentStore::new(data_dir.to_path_buf());
    let repo = RepoClient::new(&remote, token.map(str::to_string));
    let mirror = MirrorClient::new(remote.public_base());
    SyncEngine::new(store, repo, mirror)
}

fn sample_banners() -> Vec<Banner> {
    vec![Banner {
        image: "./image/b1.jpg".to_string(),
        title: "Summer Series".to_string(),
        subtitle: "Live at the pier".to_string(),
        link: "/events.html".to_string(),
    }]
}

// ----------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------

#[tokio::test]
async fn save_persists_locally_and_remotely() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    let banners = sample_banners();
    let outcome = engine.save_banners(&banners).await;

    assert!(outcome.remote_ok());
    assert_eq!(engine.get_banners(), banners);

    let stored = state.file("content/banners.json").unwrap();
    assert_eq!(stored.value, serde_json::to_value(&banners).unwrap());
}

#[tokio::test]
async fn save_keeps_local_state_when_remote_rejects() {
    let (_state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    // Point the API at a path the fixture doesn't serve so the PUT 404s.
    let mut engine = engine_at(&format!("{}/nowhere", base), temp.path(), Some("test-token"));

    let banners = sample_banners();
    let outcome = engine.save_banners(&banners).await;

    assert!(!outcome.remote_ok());
    assert_eq!(engine.get_banners(), banners);
    assert!(engine.get_data_version().is_none());

    // A fresh engine over the same store sees the write too.
    let reread = engine_at(&base, temp.path(), None);
    assert_eq!(reread.get_banners(), banners);
}

#[tokio::test]
async fn data_version_advances_only_on_successful_remote_writes() {
    let (_state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    assert!(engine.get_data_version().is_none());

    let first = engine.save_banners(&sample_banners()).await;
    assert!(first.remote_ok());
    let v1: i64 = engine.get_data_version().unwrap().parse().unwrap();

    let second = engine.save_banners(&[]).await;
    assert!(second.remote_ok());
    let v2: i64 = engine.get_data_version().unwrap().parse().unwrap();

    assert!(v2 > v1, "version must strictly advance: {} -> {}", v1, v2);
}

#[tokio::test]
async fn repeated_saves_always_carry_the_current_revision_marker() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    // The fixture rejects any PUT to an existing path whose sha is
    // stale or absent, so three successful saves in a row prove the
    // engine re-reads the marker before every write.
    for n in 0..3 {
        let banners = vec![Banner {
            title: format!("rev {}", n),
            ..Banner::default()
        }];
        let outcome = engine.save_banners(&banners).await;
        assert!(outcome.remote_ok(), "save {} failed: {:?}", n, outcome.remote);
    }

    assert_eq!(state.stale_puts.load(Ordering::SeqCst), 0);
    assert_eq!(state.puts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn saving_events_preserves_envelope_siblings() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    let posters = json!([{"image": "./image/p1.jpg", "title": "Opening", "link": ""}]);
    let carousel = json!([{"image": "./image/c1.jpg", "caption": "crowd", "link": ""}]);
    let footer = json!({"copyright": "© 2026 LIVEGIGS", "social": [], "producer": ""});
    state.seed_file(
        "content/events.json",
        json!({
            "posters": posters,
            "carousel": carousel,
            "events": [{"title": "old"}],
            "footer": footer,
            "legacy_note": "keep me",
        }),
    );

    let events = vec![Event {
        title: "Acoustic Night".to_string(),
        date: "2026-09-12".to_string(),
        ..Event::default()
    }];
    let outcome = engine.save_events(&events).await;
    assert!(outcome.remote_ok());

    let stored = state.file("content/events.json").unwrap().value;
    assert_eq!(stored["posters"], posters);
    assert_eq!(stored["carousel"], carousel);
    assert_eq!(stored["footer"], footer);
    assert_eq!(stored["legacy_note"], json!("keep me"));
    assert_eq!(stored["events"], serde_json::to_value(&events).unwrap());

    // Locally, events stay a bare sequence.
    assert_eq!(engine.get_events(), events);
}

#[tokio::test]
async fn saving_events_with_no_prior_envelope_defaults_siblings() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    let outcome = engine.save_events(&[Event::default()]).await;
    assert!(outcome.remote_ok());

    let stored = state.file("content/events.json").unwrap().value;
    assert_eq!(stored["posters"], json!([]));
    assert_eq!(stored["carousel"], json!([]));
    assert_eq!(stored["footer"], json!({}));
    assert_eq!(stored["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pull_skips_unpublished_keys_and_leaves_them_untouched() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), None);

    // Local content for a key the mirror doesn't have.
    let local_posters = vec![Poster {
        title: "local only".to_string(),
        ..Poster::default()
    }];
    engine.save_posters(PosterPage::Cn, &local_posters).await;

    state.seed_mirror("banners.json", serde_json::to_value(sample_banners()).unwrap());
    state.seed_mirror("collaborators.json", json!([]));

    let report = engine.sync_from_remote().await;

    assert_eq!(report.synced.len(), 2);
    assert_eq!(report.missing.len(), 7);
    assert!(report.failures.is_empty());
    assert_eq!(engine.get_banners(), sample_banners());
    assert_eq!(engine.get_posters(PosterPage::Cn), local_posters);
}

#[tokio::test]
async fn pull_aggregates_mirror_failures() {
    let (state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), None);

    state.seed_mirror("banners.json", json!([]));
    state.fail_mirror("collaborators.json");

    let report = engine.sync_from_remote().await;

    assert_eq!(report.synced.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, DocKey::Collaborators);
}

#[tokio::test]
async fn pull_extracts_events_from_either_shape() {
    let events_value = json!([{"title": "Acoustic Night", "date": "2026-09-12"}]);

    // Envelope shape.
    {
        let (state, base) = spawn_fixture().await;
        let temp = TempDir::new().unwrap();
        let mut engine = engine_at(&base, temp.path(), None);
        state.seed_mirror(
            "events.json",
            json!({"posters": [], "carousel": [], "events": events_value, "footer": {}}),
        );
        engine.sync_from_remote().await;
        assert_eq!(engine.get_events()[0].title, "Acoustic Night");
    }

    // Bare sequence shape.
    {
        let (state, base) = spawn_fixture().await;
        let temp = TempDir::new().unwrap();
        let mut engine = engine_at(&base, temp.path(), None);
        state.seed_mirror("events.json", events_value.clone());
        engine.sync_from_remote().await;
        assert_eq!(engine.get_events()[0].title, "Acoustic Night");
    }
}

#[tokio::test]
async fn import_of_export_is_a_content_noop() {
    let (_state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let mut engine = engine_at(&base, temp.path(), Some("test-token"));

    engine.save_banners(&sample_banners()).await;
    engine
        .save_events(&[Event {
            title: "Acoustic Night".to_string(),
            ..Event::default()
        }])
        .await;

    let before = engine.export();
    let report = engine.import(&before).await;
    assert_eq!(report.attempted(), 9);
    let after = engine.export();

    assert_eq!(before.banners, after.banners);
    assert_eq!(before.posters_index, after.posters_index);
    assert_eq!(before.posters_cn, after.posters_cn);
    assert_eq!(before.posters_events, after.posters_events);
    assert_eq!(before.events, after.events);
    assert_eq!(before.collaborators, after.collaborators);
    assert_eq!(before.footer_global, after.footer_global);
    assert_eq!(before.footer_cn, after.footer_cn);
    assert_eq!(before.carousel, after.carousel);
}

#[tokio::test]
async fn footer_defaults_stay_layered() {
    let (_state, base) = spawn_fixture().await;
    let temp = TempDir::new().unwrap();
    let engine = engine_at(&base, temp.path(), None);

    // Engine layer: missing footer key yields the site's stock footer.
    let footer = engine.get_footer(FooterSite::Cn);
    assert_eq!(footer.copyright, "© 2026 LIVEGIGS");
    assert_eq!(footer.producer, "./image/emanonent-logo.png");

    // Bridge layer: the store's generic default is the empty skeleton.
    let store = ContentStore::new(temp.path().to_path_buf());
    let bridged = store.get_or(
        DocKey::FooterCn.storage_key(),
        gigsync::Footer::default(),
    );
    assert_eq!(bridged.copyright, "");
    assert_eq!(bridged.producer, "");
    assert!(bridged.social.is_empty());
}
