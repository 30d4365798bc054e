//! A stand-in tradition repository served by axum on an ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

pub const TRADITION: &str = "trad-1";

#[derive(Debug, Clone)]
pub struct MockSection {
    pub id: String,
    pub name: String,
    pub lemma: String,
    pub dot: String,
}

pub fn section(id: &str, name: &str, lemma: &str) -> MockSection {
    MockSection {
        id: id.to_string(),
        name: name.to_string(),
        lemma: lemma.to_string(),
        dot: format!("digraph \"{name}\" {{ n{id} -> end }}"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    pub sections: Vec<MockSection>,
    pub list_status: Option<u16>,
    pub failing_lemma: Vec<String>,
    pub failing_dot: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

struct Shared {
    repo: MockRepository,
    seen: Mutex<Vec<SeenRequest>>,
}

pub struct RunningRepository {
    pub url: String,
    shared: Arc<Shared>,
}

impl RunningRepository {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.shared.seen.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl MockRepository {
    pub fn with_sections(sections: Vec<MockSection>) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }

    pub async fn start(self) -> RunningRepository {
        let shared = Arc::new(Shared {
            repo: self,
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningRepository {
            url: format!("http://{addr}"),
            shared,
        }
    }
}

async fn handle(State(shared): State<Arc<Shared>>, uri: Uri, headers: HeaderMap) -> Response {
    shared.seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let repo = &shared.repo;
    let segments: Vec<&str> = uri.path().trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        [t, "sections"] if *t == TRADITION => {
            if let Some(code) = repo.list_status {
                let status = StatusCode::from_u16(code).unwrap();
                return (status, "tradition unavailable").into_response();
            }
            let list: Vec<_> = repo
                .sections
                .iter()
                .map(|s| json!({ "id": s.id, "name": s.name, "tradition_id": TRADITION }))
                .collect();
            Json(list).into_response()
        }
        [t, "section", id, "lemmatext"] if *t == TRADITION => {
            if repo.failing_lemma.iter().any(|f| f == id) {
                return (StatusCode::INTERNAL_SERVER_ERROR, "lemma error").into_response();
            }
            match repo.sections.iter().find(|s| s.id == *id) {
                Some(s) => Json(json!({ "text": s.lemma })).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        [t, "section", id, "dot"] if *t == TRADITION => {
            if repo.failing_dot.iter().any(|f| f == id) {
                return (StatusCode::INTERNAL_SERVER_ERROR, "dot error").into_response();
            }
            match repo.sections.iter().find(|s| s.id == *id) {
                Some(s) => s.dot.clone().into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Renderer that prefixes its stdin with `<svg>`.
pub fn echo_renderer() -> stemma_svg::GraphRenderer {
    stemma_svg::GraphRenderer::new("sh", ["-c", "printf '<svg>'; cat"])
}
