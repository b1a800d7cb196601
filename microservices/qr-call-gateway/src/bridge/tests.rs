//! Unit tests for the telephony bridge

use axum::http::StatusCode;
use serde_json::json;

use super::exotel::vendor_message;
use super::*;
use crate::test_support::spawn_bridge_stub;

fn request() -> BridgeRequest {
    BridgeRequest {
        from: "+14155559999".to_string(),
        to: "+14155550000".to_string(),
        caller_id: "+918030000000".to_string(),
    }
}

#[test]
fn test_credentials_gate() {
    assert!(BridgeCredentials::new("ACtest", "token", "+918030000000").is_configured());
    assert!(!BridgeCredentials::default().is_configured());

    let mut creds = BridgeCredentials::new(ACCOUNT_SID_PLACEHOLDER, "token", "+918030000000");
    assert!(!creds.is_configured());

    creds = BridgeCredentials::new("ACtest", API_TOKEN_PLACEHOLDER, "+918030000000");
    assert!(!creds.is_configured());

    creds = BridgeCredentials::new("ACtest", "token", CALLER_ID_PLACEHOLDER);
    assert!(!creds.is_configured());

    creds = BridgeCredentials::new("ACtest", "  ", "+918030000000");
    assert!(!creds.is_configured());
}

#[test]
fn test_credentials_debug_redacts_token() {
    let rendered = format!("{:?}", BridgeCredentials::new("ACtest", "s3cr3t", "+918030000000"));
    assert!(rendered.contains("ACtest"));
    assert!(!rendered.contains("s3cr3t"));
}

#[test]
fn test_vendor_message_extraction() {
    assert_eq!(vendor_message(r#"{"message":"invalid number"}"#).as_deref(), Some("invalid number"));
    assert_eq!(
        vendor_message(r#"{"RestException":{"Status":403,"Message":"Not allowed"}}"#).as_deref(),
        Some("Not allowed")
    );
    assert_eq!(vendor_message("<html>Bad Gateway</html>"), None);
    assert_eq!(vendor_message(r#"{"code":42}"#), None);
}

#[tokio::test]
async fn test_exotel_connect_success() {
    let (base, captured) = spawn_bridge_stub(
        StatusCode::OK,
        json!({"Call": {"Sid": "CA123", "Status": "queued", "Direction": "outbound-api"}}),
    )
    .await;

    let bridge = ExotelBridge::new(base, "ACtest", "secret-token");
    let call = bridge.connect(&request()).await.unwrap();

    assert_eq!(call.call_sid, "CA123");
    assert_eq!(call.status, "queued");

    let seen = captured.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].account_sid, "ACtest");
    assert_eq!(seen[0].form["From"], "+14155559999");
    assert_eq!(seen[0].form["To"], "+14155550000");
    assert_eq!(seen[0].form["CallerId"], "+918030000000");
    assert_eq!(seen[0].form["CallType"], "trans");
    assert!(seen[0].authorization.as_deref().unwrap_or("").starts_with("Basic "));
}

#[tokio::test]
async fn test_exotel_connect_rejected_with_message() {
    let (base, _) = spawn_bridge_stub(StatusCode::BAD_REQUEST, json!({"message": "invalid number"})).await;

    let bridge = ExotelBridge::new(base, "ACtest", "secret-token");
    let err = bridge.connect(&request()).await.unwrap_err();

    assert_eq!(
        err,
        BridgeError::Rejected { status: 400, message: "invalid number".to_string() }
    );
    assert_eq!(err.user_message(), "invalid number");
}

#[tokio::test]
async fn test_exotel_connect_rejected_without_message() {
    let (base, _) = spawn_bridge_stub(StatusCode::SERVICE_UNAVAILABLE, json!({"code": 503})).await;

    let bridge = ExotelBridge::new(base, "ACtest", "secret-token");
    let err = bridge.connect(&request()).await.unwrap_err();

    assert_eq!(err.user_message(), "Request failed with status code 503");
}

#[tokio::test]
async fn test_exotel_connect_malformed_body() {
    let (base, _) = spawn_bridge_stub(StatusCode::OK, json!({"unexpected": true})).await;

    let bridge = ExotelBridge::new(base, "ACtest", "secret-token");
    let err = bridge.connect(&request()).await.unwrap_err();

    assert!(matches!(err, BridgeError::Parse(_)));
}

#[tokio::test]
async fn test_exotel_connect_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bridge = ExotelBridge::new(format!("http://{}", addr), "ACtest", "secret-token");
    let err = bridge.connect(&request()).await.unwrap_err();

    assert!(matches!(err, BridgeError::Network(_)));
    assert!(!err.user_message().is_empty());
}
