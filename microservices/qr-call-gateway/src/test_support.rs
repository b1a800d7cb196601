//! Shared fixtures for unit tests

use async_trait::async_trait;
use axum::extract::{Form, Path};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::bridge::{BridgeCall, BridgeCredentials, BridgeRequest, BridgeResult, CallBridge};

/// Request observed by the stub telephony server
#[derive(Debug, Clone)]
pub struct CapturedConnect {
    pub account_sid: String,
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
}

/// Start a local server that answers every connect request with `status` and `body`.
///
/// Returns the base URL to hand to `ExotelBridge` and the captured requests.
pub async fn spawn_bridge_stub(
    status: StatusCode,
    body: serde_json::Value,
) -> (String, Arc<Mutex<Vec<CapturedConnect>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = Router::new().route(
        "/v1/Accounts/{sid}/Calls/connect.json",
        post(
            move |Path(account_sid): Path<String>,
                  headers: HeaderMap,
                  Form(form): Form<HashMap<String, String>>| {
                let sink = sink.clone();
                let body = body.clone();
                async move {
                    sink.lock().unwrap().push(CapturedConnect {
                        account_sid,
                        authorization: headers
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        form,
                    });
                    (status, Json(body))
                }
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

/// In-process bridge returning a canned result and counting calls
pub struct RecordingBridge {
    result: BridgeResult<BridgeCall>,
    calls: AtomicUsize,
    last_request: Mutex<Option<BridgeRequest>>,
}

impl RecordingBridge {
    pub fn new(result: BridgeResult<BridgeCall>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn queued(call_sid: &str) -> Arc<Self> {
        Self::new(Ok(BridgeCall {
            call_sid: call_sid.to_string(),
            status: "queued".to_string(),
        }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<BridgeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallBridge for RecordingBridge {
    fn provider(&self) -> &'static str {
        "recording"
    }

    async fn connect(&self, request: &BridgeRequest) -> BridgeResult<BridgeCall> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.result.clone()
    }
}

/// Credentials that pass the configuration gate
pub fn live_credentials() -> BridgeCredentials {
    BridgeCredentials::new("ACtest", "secret-token", "+918030000000")
}
