//! HTTP handlers
//!
//! JSON for the generate endpoint and health checks, HTML for redemption pages.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::HOST, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::error;

use crate::config::GatewayConfig;
use crate::flow::{GenerateRequest, RedeemError, Redemption};
use crate::pages;
use crate::state::AppState;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn json_error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(msg))).into_response()
}

/// Base for redemption URLs: configured, else taken from the request.
///
/// Without `x-forwarded-proto` the request reached us directly, which is plain HTTP.
fn public_base_url(config: &GatewayConfig, headers: &HeaderMap) -> Option<String> {
    if let Some(base) = &config.public_base_url {
        return Some(base.clone());
    }
    let host = headers.get(HOST)?.to_str().ok()?;
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    Some(format!("{}://{}", proto, host))
}

// =============================================================================
// Generate
// =============================================================================

pub async fn generate_qr(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let Some(base_url) = public_base_url(&state.config, &headers) else {
        return json_error(StatusCode::BAD_REQUEST, "Cannot determine host for the call URL");
    };

    match state.links.generate(&request, &base_url) {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!(code = e.error_code(), error = %e, "Error generating QR code");
                json_error(status, format!("Failed to generate QR code: {}", e))
            } else {
                json_error(status, e.to_string())
            }
        }
    }
}

// =============================================================================
// Redeem
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RedeemQuery {
    pub from: Option<String>,
}

/// Query shape of the first deployment: `/api/call?callId=...&from=...`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRedeemQuery {
    pub action: Option<String>,
    pub call_id: Option<String>,
    pub from: Option<String>,
}

pub async fn redeem_path(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<RedeemQuery>,
) -> Response {
    redeem(&state, &token, query.from.as_deref()).await
}

pub async fn redeem_query(
    State(state): State<AppState>,
    Query(query): Query<LegacyRedeemQuery>,
) -> Response {
    // Untrimmed: a trailing space may be a '+' lost to query decoding
    match query.call_id.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(token) => redeem(&state, token, query.from.as_deref()).await,
        None => (StatusCode::BAD_REQUEST, Html(pages::invalid_code("Missing call ID"))).into_response(),
    }
}

async fn redeem(state: &AppState, token: &str, from: Option<&str>) -> Response {
    match state.links.redeem(token, from).await {
        Ok(Redemption::AwaitingCallerNumber { token, intent }) => {
            (StatusCode::OK, Html(pages::caller_prompt(&token, &intent, None))).into_response()
        }
        Ok(Redemption::Dispatched { intent, from, outcome, .. }) => {
            let status = if outcome.is_success() {
                StatusCode::OK
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Html(pages::dispatched(&intent, &from, &outcome))).into_response()
        }
        Err(RedeemError::InvalidToken(e)) => {
            (StatusCode::BAD_REQUEST, Html(pages::invalid_code(&e.to_string()))).into_response()
        }
        Err(RedeemError::InvalidCaller { token, intent, source }) => (
            StatusCode::BAD_REQUEST,
            Html(pages::caller_prompt(&token, &intent, Some(&source.to_string()))),
        )
            .into_response(),
    }
}

// =============================================================================
// Combined `/api?action=` entry point
// =============================================================================

pub async fn action_get(State(state): State<AppState>, Query(query): Query<LegacyRedeemQuery>) -> Response {
    match query.action.as_deref() {
        Some("call") => redeem_query(State(state), Query(query)).await,
        _ => (StatusCode::BAD_REQUEST, Html(pages::invalid_code("Unknown action"))).into_response(),
    }
}

pub async fn action_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LegacyRedeemQuery>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    match query.action.as_deref() {
        Some("generate-qr") | Some("generate") => generate_qr(State(state), headers, payload).await,
        _ => json_error(StatusCode::BAD_REQUEST, "Unknown action"),
    }
}

// =============================================================================
// Pages, admin and health checks
// =============================================================================

pub async fn index() -> Html<String> {
    Html(pages::index())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingsResponse {
    pub cache_enabled: bool,
    pub mappings: Vec<crate::cache::MappingView>,
}

/// Intents generated by this process, numbers masked
pub async fn admin_mappings(State(state): State<AppState>) -> Json<ApiResponse<MappingsResponse>> {
    let cache = state.links.cache();
    Json(ApiResponse::success(MappingsResponse {
        cache_enabled: cache.is_some(),
        mappings: cache.map(|c| c.masked_mappings()).unwrap_or_default(),
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.health()))
}

pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.readiness()))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.metrics.snapshot()))
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// Response for a handler that panicked
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::internal_error())).into_response()
}
