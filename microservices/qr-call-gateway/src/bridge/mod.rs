//! Telephony bridge trait and implementations

pub mod exotel;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

pub use exotel::ExotelBridge;

/// Placeholder values shipped in `.env.example`
pub const ACCOUNT_SID_PLACEHOLDER: &str = "your_exotel_sid_here";
pub const API_TOKEN_PLACEHOLDER: &str = "your_exotel_token_here";
pub const CALLER_ID_PLACEHOLDER: &str = "your_exotel_virtual_number";

/// Result of bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Parse(String),
}

impl BridgeError {
    /// Message suitable for showing to the person who asked for the call
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(msg) => msg.clone(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Parse(msg) => format!("Malformed response from telephony provider: {}", msg),
        }
    }
}

/// One bridged call: ring `from`, then connect it to `to`, presenting `caller_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeRequest {
    pub from: String,
    pub to: String,
    pub caller_id: String,
}

/// Vendor acknowledgement of a bridged call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeCall {
    pub call_sid: String,
    pub status: String,
}

/// Account credentials for the telephony provider.
///
/// Missing values and the documented placeholders both count as
/// "not configured".
#[derive(Clone, Default)]
pub struct BridgeCredentials {
    pub account_sid: Option<String>,
    pub api_token: Option<String>,
    pub caller_id: Option<String>,
}

impl BridgeCredentials {
    pub fn new(
        account_sid: impl Into<String>,
        api_token: impl Into<String>,
        caller_id: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: Some(account_sid.into()),
            api_token: Some(api_token.into()),
            caller_id: Some(caller_id.into()),
        }
    }

    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            account_sid: var("EXOTEL_SID"),
            api_token: var("EXOTEL_TOKEN"),
            caller_id: var("FROM_NUMBER"),
        }
    }

    pub fn is_configured(&self) -> bool {
        fn usable(value: &Option<String>, placeholder: &str) -> bool {
            matches!(value, Some(v) if !v.trim().is_empty() && v != placeholder)
        }

        usable(&self.account_sid, ACCOUNT_SID_PLACEHOLDER)
            && usable(&self.api_token, API_TOKEN_PLACEHOLDER)
            && usable(&self.caller_id, CALLER_ID_PLACEHOLDER)
    }
}

impl fmt::Debug for BridgeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeCredentials")
            .field("account_sid", &self.account_sid)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("caller_id", &self.caller_id)
            .finish()
    }
}

/// Trait every telephony provider implements
#[async_trait]
pub trait CallBridge: Send + Sync {
    /// Provider identifier, used in logs
    fn provider(&self) -> &'static str;

    /// Ask the provider to bridge two numbers. Issued once, never retried.
    async fn connect(&self, request: &BridgeRequest) -> BridgeResult<BridgeCall>;
}
