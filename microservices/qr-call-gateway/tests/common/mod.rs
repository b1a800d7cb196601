#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::Form;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use tower::ServiceExt;

use qr_call_gateway::{build_router, AppState, BridgeCredentials, GatewayConfig};

pub const HOST: &str = "qr.example.com";

/// Router with simulated dispatch and default policies
pub fn build_test_app() -> Router {
    build_app_with(GatewayConfig::default())
}

pub fn build_app_with(config: GatewayConfig) -> Router {
    build_router(AppState::new(config))
}

/// Config pointing the Exotel bridge at a stub server
pub fn configured_for(api_base: &str) -> GatewayConfig {
    GatewayConfig {
        exotel_api_base: api_base.to_string(),
        credentials: BridgeCredentials::new("ACtest", "secret-token", "+918030000000"),
        ..GatewayConfig::default()
    }
}

/// Local server answering every connect request with `status` and `body`.
///
/// Returns the base URL and the form fields of each request received.
pub async fn spawn_exotel_stub(
    status: StatusCode,
    body: serde_json::Value,
) -> (String, Arc<Mutex<Vec<HashMap<String, String>>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = Router::new().route(
        "/v1/Accounts/{sid}/Calls/connect.json",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let sink = sink.clone();
            let body = body.clone();
            async move {
                sink.lock().unwrap().push(form);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("host", HOST)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("host", HOST)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Generate a link through the API and return its token
pub async fn generate_token(app: Router, phone_number: &str, label: &str) -> String {
    let response = post_json(
        app,
        "/generate-qr",
        serde_json::json!({ "phoneNumber": phone_number, "label": label }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["callId"].as_str().unwrap().to_string()
}
