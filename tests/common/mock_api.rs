//! Mock catalog API for testing the client, browser and CLI.
//!
//! Serves a fixed catalog of generated characters with the real API's
//! paging (20 per page), filters and 404-on-empty behavior.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const PAGE_SIZE: usize = 20;
pub const CATALOG_SIZE: i64 = 45;
pub const EPISODE_COUNT: i64 = 10;

const BASE_NAMES: [&str; 5] = [
    "Rick Sanchez",
    "Morty Smith",
    "Summer Smith",
    "Beth Smith",
    "Jerry Smith",
];

/// Status of generated character `id`: ids cycle Alive, Dead, unknown.
pub fn status_of(id: i64) -> &'static str {
    match id % 3 {
        1 => "Alive",
        2 => "Dead",
        _ => "unknown",
    }
}

pub fn species_of(id: i64) -> &'static str {
    if id % 2 == 1 {
        "Human"
    } else {
        "Alien"
    }
}

pub fn gender_of(id: i64) -> &'static str {
    match id % 4 {
        1 => "Male",
        2 => "Female",
        3 => "Genderless",
        _ => "unknown",
    }
}

pub fn name_of(id: i64) -> String {
    format!("{} C-{}", BASE_NAMES[((id - 1) % 5) as usize], id)
}

#[derive(Clone)]
struct MockState {
    base_url: String,
    characters: Arc<Vec<Value>>,
    requests: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
    failing_from_page: Arc<AtomicUsize>,
}

/// Mock catalog server.
pub struct MockApi {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockApi {
    /// Start a new mock catalog server.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        let characters = (1..=CATALOG_SIZE)
            .map(|id| character_json(&base_url, id))
            .collect();
        let state = MockState {
            base_url,
            characters: Arc::new(characters),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
            failing_from_page: Arc::new(AtomicUsize::new(0)),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/api/character", get(list_characters))
            .route("/api/character/{id}", get(get_character))
            .route("/api/episode/{id}", get(get_episode))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Base URL including the `/api` prefix.
    pub fn base_url(&self) -> String {
        self.state.base_url.clone()
    }

    /// Answer every request with a 500 until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer character listings for `page` and later with a 500.
    /// Zero turns it off.
    pub fn fail_pages_from(&self, page: usize) {
        self.state.failing_from_page.store(page, Ordering::SeqCst);
    }

    /// Path and query of every request received so far.
    pub async fn requests(&self) -> Vec<String> {
        self.state.requests.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.state.requests.lock().await.clear();
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn character_json(base_url: &str, id: i64) -> Value {
    json!({
        "id": id,
        "name": name_of(id),
        "status": status_of(id),
        "species": species_of(id),
        "type": if id % 7 == 0 { "Parasite" } else { "" },
        "gender": gender_of(id),
        "origin": { "name": "Earth (C-137)", "url": format!("{}/location/1", base_url) },
        "location": { "name": "Citadel of Ricks", "url": format!("{}/location/3", base_url) },
        "image": format!("{}/character/avatar/{}.jpeg", base_url, id),
        "episode": [
            format!("{}/episode/1", base_url),
            format!("{}/episode/{}", base_url, id % 5 + 2),
        ],
        "url": format!("{}/character/{}", base_url, id),
        "created": "2017-11-04T18:48:46.250Z",
    })
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}

async fn record(state: &MockState, uri: &Uri) -> bool {
    let entry = match uri.query() {
        Some(q) => format!("{}?{}", uri.path(), q),
        None => uri.path().to_string(),
    };
    state.requests.lock().await.push(entry);
    state.failing.load(Ordering::SeqCst)
}

fn field_eq(character: &Value, field: &str, expected: Option<&String>) -> bool {
    match expected {
        None => true,
        Some(expected) => character[field]
            .as_str()
            .is_some_and(|v| v.eq_ignore_ascii_case(expected)),
    }
}

async fn list_characters(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
) -> Response {
    if record(&state, &uri).await {
        return server_error();
    }

    let name = params.get("name").map(|n| n.to_lowercase());
    let matching: Vec<&Value> = state
        .characters
        .iter()
        .filter(|c| match &name {
            Some(name) => c["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(name.as_str())),
            None => true,
        })
        .filter(|c| field_eq(c, "status", params.get("status")))
        .filter(|c| field_eq(c, "species", params.get("species")))
        .filter(|c| field_eq(c, "gender", params.get("gender")))
        .collect();

    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let fail_from = state.failing_from_page.load(Ordering::SeqCst);
    if fail_from > 0 && page >= fail_from {
        return server_error();
    }
    let pages = matching.len().div_ceil(PAGE_SIZE);
    if matching.is_empty() || page == 0 || page > pages {
        return not_found("There is nothing here");
    }

    let results: Vec<Value> = matching
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|c| (*c).clone())
        .collect();
    let link = |p: usize| format!("{}/character?page={}", state.base_url, p);

    Json(json!({
        "info": {
            "count": matching.len(),
            "pages": pages,
            "next": (page < pages).then(|| link(page + 1)),
            "prev": (page > 1).then(|| link(page - 1)),
        },
        "results": results,
    }))
    .into_response()
}

async fn get_character(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response {
    if record(&state, &uri).await {
        return server_error();
    }
    match state.characters.iter().find(|c| c["id"] == id) {
        Some(character) => Json(character.clone()).into_response(),
        None => not_found("Character not found"),
    }
}

async fn get_episode(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response {
    if record(&state, &uri).await {
        return server_error();
    }
    if !(1..=EPISODE_COUNT).contains(&id) {
        return not_found("Episode not found");
    }
    Json(json!({
        "id": id,
        "name": format!("Episode {}", id),
        "air_date": "December 2, 2013",
        "episode": format!("S01E{:02}", id),
        "characters": [],
        "url": format!("{}/episode/{}", state.base_url, id),
        "created": "2017-11-10T12:56:33.798Z",
    }))
    .into_response()
}
