use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use configs::Disclosure;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{self, auth::ServerState};
use service::auth::IdentityResolver;
use service::items::repository::mock::MockItemStore;
use service::items::service::CrudPolicy;

const SECRET: &[u8] = b"items-test-secret";

fn app(policy: CrudPolicy) -> (Router, Arc<MockItemStore>) {
    let store = Arc::new(MockItemStore::default());
    let state = ServerState {
        store: store.clone(),
        identity: Arc::new(IdentityResolver::new(SECRET, &[Algorithm::HS256], 0).unwrap()),
        policy,
    };
    (routes::build_router(state, tower_http::cors::CorsLayer::very_permissive()), store)
}

fn token(sub: &str, is_superuser: bool) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
    encode(
        &Header::default(),
        &json!({"sub": sub, "is_superuser": is_superuser, "exp": exp}),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> (StatusCode, HeaderMap, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = bearer {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, headers, value)
}

async fn create_as(app: &Router, tok: &str, title: &str) -> Value {
    let (status, _, body) = send(app, "POST", "/items", Some(tok), Some(json!({"title": title}))).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_needs_no_credential() {
    let (app, _) = app(CrudPolicy::default());
    let (status, _, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app(CrudPolicy::default());
    let (status, _, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/items/{id}"].is_object());
}

#[tokio::test]
async fn rejected_credentials_get_uniform_401() {
    let (app, store) = app(CrudPolicy::default());
    let expired = encode(
        &Header::default(),
        &json!({"sub": "alice", "exp": (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp()}),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    let forged = encode(
        &Header::default(),
        &json!({"sub": "alice", "exp": (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp()}),
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    for bearer in [None, Some("not-a-jwt"), Some(expired.as_str()), Some(forged.as_str())] {
        let (status, headers, body) = send(&app, "POST", "/items", bearer, Some(json!({"title": "x"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        assert_eq!(body["error"], "Could not validate credentials");
    }

    let req = Request::builder()
        .uri("/items")
        .header(header::AUTHORIZATION, format!("Basic {}", token("alice", false)))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);
    assert!(store.is_empty());
}

#[tokio::test]
async fn create_sets_owner_from_token() {
    let (app, _) = app(CrudPolicy::default());
    let alice = token("alice", false);
    let (status, _, body) = send(
        &app,
        "POST",
        "/items",
        Some(&alice),
        Some(json!({"title": "T1", "description": "d", "owner_id": "mallory"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner_id"], "alice");
    assert_eq!(body["title"], "T1");
    assert_eq!(body["description"], "d");
    assert!(body["id"].as_str().and_then(|s| Uuid::parse_str(s).ok()).is_some());
}

#[tokio::test]
async fn list_is_scoped_to_owner_unless_privileged() {
    let (app, _) = app(CrudPolicy::default());
    let (alice, bob, admin) = (token("alice", false), token("bob", false), token("root", true));
    create_as(&app, &alice, "a1").await;
    create_as(&app, &alice, "a2").await;
    create_as(&app, &bob, "b1").await;

    let (status, _, body) = send(&app, "GET", "/items", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert!(body["data"].as_array().unwrap().iter().all(|i| i["owner_id"] == "alice"));

    let (_, _, body) = send(&app, "GET", "/items?skip=1&limit=1", Some(&alice), None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["title"], "a2");

    let (_, _, body) = send(&app, "GET", "/items", Some(&admin), None).await;
    assert_eq!(body["count"], 3);

    let (_, _, body) = send(&app, "GET", "/items?skip=10", Some(&bob), None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn zero_limit_is_a_validation_error() {
    let (app, _) = app(CrudPolicy::default());
    let (status, _, body) = send(&app, "GET", "/items?limit=0", Some(&token("alice", false)), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["fields"][0]["field"], "limit");
}

#[tokio::test]
async fn foreign_item_is_forbidden_and_left_untouched() {
    let (app, _) = app(CrudPolicy::default());
    let (alice, bob) = (token("alice", false), token("bob", false));
    let item = create_as(&app, &alice, "T1").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not enough permissions");

    let (status, _, _) = send(&app, "PUT", &uri, Some(&bob), Some(json!({"title": "X"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(&app, "GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, item);
}

#[tokio::test]
async fn concealed_denials_look_like_missing_items() {
    let policy = CrudPolicy { disclosure: Disclosure::Conceal, ..CrudPolicy::default() };
    let (app, _) = app(policy);
    let item = create_as(&app, &token("alice", false), "T1").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (denied, _, denied_body) = send(&app, "GET", &uri, Some(&token("bob", false)), None).await;
    let (missing, _, missing_body) =
        send(&app, "GET", &format!("/items/{}", Uuid::new_v4()), Some(&token("bob", false)), None).await;
    assert_eq!(denied, StatusCode::NOT_FOUND);
    assert_eq!(missing, StatusCode::NOT_FOUND);
    assert_eq!(denied_body, missing_body);
}

#[tokio::test]
async fn update_merges_present_fields_only() {
    let (app, _) = app(CrudPolicy::default());
    let alice = token("alice", false);
    let (_, _, item) =
        send(&app, "POST", "/items", Some(&alice), Some(json!({"title": "T1", "description": "keep"}))).await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "PUT", &uri, Some(&alice), Some(json!({"title": "T2"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T2");
    assert_eq!(body["description"], "keep");
    assert_eq!(body["owner_id"], "alice");

    let (_, _, body) = send(&app, "PUT", &uri, Some(&alice), Some(json!({"description": null}))).await;
    assert_eq!(body["title"], "T2");
    assert_eq!(body["description"], Value::Null);

    let (status, _, body) = send(&app, "PUT", &uri, Some(&alice), Some(json!({"title": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "title");
}

#[tokio::test]
async fn privileged_caller_may_update_any_item() {
    let (app, _) = app(CrudPolicy::default());
    let item = create_as(&app, &token("alice", false), "T1").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "PUT", &uri, Some(&token("root", true)), Some(json!({"title": "fixed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "fixed");
    assert_eq!(body["owner_id"], "alice");
}

#[tokio::test]
async fn invalid_create_writes_nothing() {
    let (app, store) = app(CrudPolicy::default());
    let (status, _, body) = send(&app, "POST", "/items", Some(&token("alice", false)), Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "title");
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_then_delete_again_is_not_found() {
    let (app, store) = app(CrudPolicy::default());
    let alice = token("alice", false);
    let item = create_as(&app, &alice, "T1").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");
    assert!(store.is_empty());

    let (status, _, body) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
    let (status, _, _) = send(&app, "GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_gets_json_validation_body() {
    let (app, store) = app(CrudPolicy::default());
    let alice = token("alice", false);

    let (status, headers, body) =
        send(&app, "POST", "/items", Some(&alice), Some(json!({"description": "no title"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["fields"][0]["field"], "title");

    let (status, _, body) = send(&app, "POST", "/items", Some(&alice), Some(json!({"title": 5}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["fields"][0]["field"], "title");
    assert!(store.is_empty());

    let (status, _, body) =
        send(&app, "PUT", "/items/not-a-uuid", Some(&alice), Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "id");

    let (status, _, body) = send(&app, "DELETE", "/items/not-a-uuid", Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "id");

    let (status, headers, body) = send(&app, "GET", "/items?skip=-1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(body["error"], "Validation Error");
    assert!(body["fields"][0]["message"].is_string());
}

#[tokio::test]
async fn oversized_skip_is_rejected_before_the_store() {
    let (app, _) = app(CrudPolicy::default());
    let (status, _, body) =
        send(&app, "GET", "/items?skip=9223372036854775808", Some(&token("alice", false)), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "skip");
}
