//! Exotel "connect two numbers" adapter

use async_trait::async_trait;
use serde::Deserialize;

use super::{BridgeCall, BridgeError, BridgeRequest, BridgeResult, CallBridge};

pub const DEFAULT_API_BASE: &str = "https://api.exotel.com";

/// `Calls/connect.json` success body
#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(rename = "Call")]
    call: ConnectedCall,
}

#[derive(Debug, Deserialize)]
struct ConnectedCall {
    #[serde(rename = "Sid")]
    sid: String,
    #[serde(rename = "Status")]
    status: String,
}

pub struct ExotelBridge {
    api_base: String,
    account_sid: String,
    api_token: String,
    http_client: reqwest::Client,
}

impl ExotelBridge {
    pub fn new(api_base: impl Into<String>, account_sid: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            account_sid: account_sid.into(),
            api_token: api_token.into(),
            http_client: reqwest::Client::new(),
        }
    }

    fn connect_url(&self) -> String {
        format!(
            "{}/v1/Accounts/{}/Calls/connect.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

/// Pull a human-readable message out of an error body.
///
/// Exotel answers with either `{"message": ...}` or
/// `{"RestException": {"Message": ...}}`.
pub(crate) fn vendor_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["message"]
        .as_str()
        .or_else(|| value["RestException"]["Message"].as_str())
        .map(str::to_string)
}

#[async_trait]
impl CallBridge for ExotelBridge {
    fn provider(&self) -> &'static str {
        "exotel"
    }

    async fn connect(&self, request: &BridgeRequest) -> BridgeResult<BridgeCall> {
        let form = [
            ("From", request.from.as_str()),
            ("To", request.to.as_str()),
            ("CallerId", request.caller_id.as_str()),
            ("CallType", "trans"),
        ];

        let response = self
            .http_client
            .post(self.connect_url())
            .basic_auth(&self.account_sid, Some(&self.api_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "Exotel rejected connect request");
            let message = vendor_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            return Err(BridgeError::Rejected { status: status.as_u16(), message });
        }

        let parsed: ConnectResponse =
            serde_json::from_str(&body).map_err(|e| BridgeError::Parse(e.to_string()))?;

        Ok(BridgeCall {
            call_sid: parsed.call.sid,
            status: parsed.call.status,
        })
    }
}
