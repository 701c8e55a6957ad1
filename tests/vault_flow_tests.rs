//! End-to-end flows through the public router over the in-memory store.
//!
//! Run with: cargo test --test vault_flow_tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pattern_vault::api::{create_router, ServerState};
use pattern_vault::auth::jwt::encode_jwt;
use pattern_vault::prompts::select_prompt;
use pattern_vault::store::InMemoryStore;
use pattern_vault::{AppState, AuthConfig, Config, StoreBackend};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret-at-least-32-chars";

fn test_config(allow_registration: bool) -> Config {
    Config {
        server_port: 0,
        store_backend: StoreBackend::Memory,
        neo4j_uri: String::new(),
        neo4j_user: String::new(),
        neo4j_password: String::new(),
        promote_reflections: true,
        auth_config: Some(AuthConfig {
            jwt_secret: SECRET.into(),
            jwt_expiry_secs: 600,
            allowed_email_domain: None,
            allow_registration,
        }),
    }
}

/// A router plus the bearer header of one signed-in user
struct Session {
    router: Router,
    authorization: String,
}

impl Session {
    fn new(router: Router, user_id: Uuid, email: &str) -> Self {
        let token = encode_jwt(user_id, email, "Vault User", SECRET, 600).unwrap();
        Self {
            router,
            authorization: format!("Bearer {}", token),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", &self.authorization);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, json) = self.send("POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} -> {}", uri, json);
        json
    }
}

fn router(allow_registration: bool) -> Router {
    let app = AppState::with_store(Arc::new(InMemoryStore::new()), test_config(allow_registration));
    create_router(Arc::new(ServerState::new(&app)))
}

#[tokio::test]
async fn test_area_note_count_follows_notes() {
    let session = Session::new(router(false), Uuid::new_v4(), "sam@example.com");

    let area = session.create("/api/areas", json!({"name": "Health"})).await;
    let area_id = area["id"].as_str().unwrap();

    let first = session
        .create(
            "/api/notes",
            json!({"title": "Slept 8h", "tags": ["MOOD"], "area_id": area_id}),
        )
        .await;

    let (status, areas) = session.send("GET", "/api/areas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(areas[0]["name"], "Health");
    assert_eq!(areas[0]["note_count"], 1);

    let (status, _) = session
        .send("DELETE", &format!("/api/notes/{}", first["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, areas) = session.send("GET", "/api/areas", None).await;
    assert_eq!(areas[0]["note_count"], 0);

    session
        .create(
            "/api/notes",
            json!({"title": "Ran 5k", "tags": ["WIN"], "area_id": area_id}),
        )
        .await;

    let (_, detail) = session
        .send("GET", &format!("/api/areas/{}", area_id), None)
        .await;
    assert_eq!(detail["note_count"], 1);

    // Deleting the area leaves the note in Archive
    let (status, _) = session
        .send("DELETE", &format!("/api/areas/{}", area_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, archived) = session.send("GET", "/api/notes?bucket=archive", None).await;
    assert_eq!(archived.as_array().unwrap().len(), 1);
    assert_eq!(archived[0]["title"], "Ran 5k");
    assert!(archived[0]["area"].is_null());
}

#[tokio::test]
async fn test_connection_pair_is_unique_per_direction() {
    let session = Session::new(router(false), Uuid::new_v4(), "tia@example.com");
    let a = session.create("/api/notes", json!({"title": "A"})).await;
    let b = session.create("/api/notes", json!({"title": "B"})).await;

    let pair = json!({"source_note_id": a["id"], "target_note_id": b["id"], "strength": 2});
    let first = session.create("/api/connections", pair.clone()).await;
    assert_eq!(first["strength"], 2);

    let (status, body) = session.send("POST", "/api/connections", Some(pair)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Connection already exists");

    session
        .create(
            "/api/connections",
            json!({"source_note_id": b["id"], "target_note_id": a["id"]}),
        )
        .await;

    // Deleting a note takes its connections with it
    let (status, _) = session
        .send("DELETE", &format!("/api/notes/{}", a["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = session
        .send("GET", &format!("/api/notes/{}", b["id"].as_str().unwrap()), None)
        .await;
    assert!(detail["connections_as_source"].as_array().unwrap().is_empty());
    assert!(detail["connections_as_target"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_users_cannot_see_each_other() {
    let app = router(false);
    let alice = Session::new(app.clone(), Uuid::new_v4(), "alice@example.com");
    let bob = Session::new(app, Uuid::new_v4(), "bob@example.com");

    let note = alice.create("/api/notes", json!({"title": "Private"})).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, _) = bob.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = bob.send("PATCH", &uri, Some(json!({"title": "Mine"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = bob.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = bob.send("GET", "/api/notes", None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, still_there) = alice.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["title"], "Private");
}

#[tokio::test]
async fn test_daily_prompt_flow() {
    let session = Session::new(router(false), Uuid::new_v4(), "uma@example.com");

    let (status, prompt) = session
        .send("GET", "/api/daily-prompts?date=2027-01-01", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let jan_first = chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
    assert_eq!(prompt["question"], select_prompt(jan_first));
    assert_eq!(prompt["completed"], false);

    // The stored question wins over one supplied with the answer
    let answered = session
        .create(
            "/api/daily-prompts",
            json!({"response": "Finished the draft", "question": "Other?", "date": "2027-01-01"}),
        )
        .await;
    assert_eq!(answered["id"], prompt["id"]);
    assert_eq!(answered["question"], prompt["question"]);
    assert_eq!(answered["completed"], true);

    let (_, history) = session.send("GET", "/api/daily-prompts/history", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (_, journal) = session.send("GET", "/api/notes", None).await;
    assert_eq!(journal[0]["source"], "JOURNAL");
    assert_eq!(journal[0]["content"], "Finished the draft");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = router(true);
    let post = |uri: &str, body: Value| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let resp = app
        .clone()
        .oneshot(post(
            "/auth/register",
            json!({"email": "vic@example.com", "password": "hunter2hunter2", "name": "Vic"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(post(
            "/auth/login",
            json!({"email": "Vic@Example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let login: Value = serde_json::from_slice(&bytes).unwrap();
    let token = login["token"].as_str().unwrap();

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let me: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["name"], "Vic");
    assert_eq!(me["id"], login["user"]["id"]);
}
