//! In-process stand-in for the search service.
//!
//! Serves the same routes as the real service on an ephemeral port and records
//! every search body it receives.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use moviescope_core::WidgetConfig;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
}

pub struct MockService {
    pub base_url: String,
    recorded: Recorded,
}

impl MockService {
    pub async fn start() -> Self {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/api", post(search))
            .route("/api/item/{id}", post(item))
            .route("/hc", get(health))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("No local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service stopped");
        });

        MockService {
            base_url: format!("http://{addr}"),
            recorded,
        }
    }

    pub fn config(&self) -> WidgetConfig {
        WidgetConfig {
            base_url: self.base_url.clone(),
            ..WidgetConfig::default()
        }
    }

    /// Search bodies received so far, in arrival order.
    pub fn bodies(&self) -> Vec<Value> {
        self.recorded.bodies.lock().unwrap().clone()
    }
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

async fn search(State(recorded): State<Recorded>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    recorded.bodies.lock().unwrap().push(body.clone());
    match body["title"].as_str().unwrap_or_default() {
        "missing" => not_found(),
        "garbled" => (StatusCode::OK, Json(json!({ "unexpected": true }))),
        title if title.contains("matrix") => (
            StatusCode::OK,
            Json(json!([{
                "tconst": "tt0133093",
                "title_type": "movie",
                "primary_title": "The Matrix",
                "original_title": "The Matrix",
                "is_adult": 0,
                "start_year": 1999,
                "end_year": 0,
                "runtime_minutes": 136,
                "genres": "Action,Sci-Fi"
            }])),
        ),
        _ => (StatusCode::OK, Json(json!([]))),
    }
}

async fn item(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id != "tt0133093" {
        return not_found();
    }
    (
        StatusCode::OK,
        Json(json!({
            "title": "The Matrix",
            "year": 1999,
            "crew": { "tconst": "tt0133093", "directors": ["nm0905154"], "writers": [] },
            "principals": [["Keanu Reeves", "actor"]]
        })),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
