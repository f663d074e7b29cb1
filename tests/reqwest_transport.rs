//! Real HTTP round trips through `ReqwestTransport` against a local axum server

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use recipe_bench::models::RequestValues;
use recipe_bench::network::{prepare, RequestExecutor};
use recipe_bench::{
    AuthKind, EndpointDescriptor, ExecuteError, HttpMethod, ParamSpec, ParameterSchema,
    ReqwestTransport, RequestResult, ResponseBody, SecretStore,
};

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "received": body, "authorization": auth }))
}

async fn missing() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

async fn plain() -> &'static str {
    "pong"
}

async fn body_length(body: String) -> Json<Value> {
    Json(json!({ "length": body.len() }))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/echo", post(echo))
        .route("/missing", get(missing))
        .route("/ping", get(plain))
        .route("/inspect", post(body_length));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn executor() -> RequestExecutor<ReqwestTransport> {
    RequestExecutor::new(ReqwestTransport::new(Duration::from_secs(5)))
}

fn values(body: Value) -> RequestValues {
    body.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_post_with_bearer_round_trip() {
    let base = spawn_server().await;
    let endpoint =
        EndpointDescriptor::new("local", "Echo", HttpMethod::POST, format!("{}/echo", base))
            .with_auth(AuthKind::Bearer)
            .with_body(ParameterSchema::new(vec![
                ParamSpec::new("name", true),
                ParamSpec::new("n", false),
            ]));
    let mut secrets = SecretStore::new();
    secrets.set("local", "tok");

    let result = executor()
        .execute(&endpoint, &values(json!({"name": "Ada", "n": 1})), &secrets)
        .await;

    let RequestResult::Success(payload) = result else {
        panic!("expected a response, got {:?}", result);
    };
    assert_eq!(payload.status_code, 200);
    assert_eq!(
        payload.body,
        ResponseBody::Json(json!({
            "received": {"name": "Ada", "n": 1},
            "authorization": "Bearer tok"
        }))
    );
}

#[tokio::test]
async fn test_post_without_schema_sends_no_body() {
    let base = spawn_server().await;
    let endpoint =
        EndpointDescriptor::new("local", "Inspect", HttpMethod::POST, format!("{}/inspect", base));
    assert!(!endpoint.is_body_bearing());

    let result = executor()
        .execute(&endpoint, &values(json!({"stray": true})), &SecretStore::new())
        .await;

    let RequestResult::Success(payload) = result else {
        panic!("expected a response, got {:?}", result);
    };
    assert_eq!(payload.status_code, 200);
    assert_eq!(payload.body, ResponseBody::Json(json!({"length": 0})));
}

#[tokio::test]
async fn test_error_status_is_still_a_response() {
    let base = spawn_server().await;
    let endpoint =
        EndpointDescriptor::new("local", "Missing", HttpMethod::GET, format!("{}/missing", base));

    let result = executor()
        .execute(&endpoint, &RequestValues::new(), &SecretStore::new())
        .await;

    let RequestResult::Success(payload) = result else {
        panic!("expected a response, got {:?}", result);
    };
    assert_eq!(payload.status_code, 404);
    assert!(!payload.is_success_status());
    assert_eq!(payload.body, ResponseBody::Json(json!({"error": "not found"})));
}

#[tokio::test]
async fn test_plain_text_body_kept_as_text() {
    let base = spawn_server().await;
    let endpoint =
        EndpointDescriptor::new("local", "Ping", HttpMethod::GET, format!("{}/ping", base));
    let request = prepare(&endpoint, &RequestValues::new(), &SecretStore::new()).unwrap();
    assert_eq!(request.body, None);

    let result = executor().send(&request).await;
    let RequestResult::Success(payload) = result else {
        panic!("expected a response, got {:?}", result);
    };
    assert_eq!(payload.body, ResponseBody::Text("pong".into()));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint =
        EndpointDescriptor::new("local", "Gone", HttpMethod::GET, format!("http://{}/", addr));
    let result = executor()
        .execute(&endpoint, &RequestValues::new(), &SecretStore::new())
        .await;

    assert!(matches!(result, RequestResult::Failure(ExecuteError::NetworkError(_))));
}
