//! Generate and redeem: the two operations every transport exposes

use qrcall_core::{mask_phone_number, validate_phone_number, CallIntent, QrCallError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::bridge::CallBridge;
use crate::cache::IntentCache;
use crate::codec::{self, DecodeError, FallbackPolicy};
use crate::config::GatewayConfig;
use crate::dispatcher::{CallDispatcher, DispatchOutcome};
use crate::metrics::GatewayMetrics;
use crate::qr::QrRenderer;

pub const MAX_LABEL_LEN: u64 = 100;

/// Body of a generate request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_LABEL_LEN))]
    pub label: Option<String>,
}

/// Result of a generate request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLink {
    pub success: bool,
    pub call_id: String,
    pub qr_code: String,
    pub call_url: String,
    pub label: String,
}

/// Where a redemption ended up
#[derive(Debug, Clone)]
pub enum Redemption {
    /// Token decoded, no caller number yet
    AwaitingCallerNumber { token: String, intent: CallIntent },
    /// Terminal; there is no retry transition
    Dispatched {
        token: String,
        intent: CallIntent,
        from: String,
        outcome: DispatchOutcome,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("Invalid call code: {0}")]
    InvalidToken(#[from] DecodeError),

    #[error("{source}")]
    InvalidCaller {
        token: String,
        intent: CallIntent,
        source: QrCallError,
    },
}

pub struct CallLinkService {
    dispatcher: CallDispatcher,
    renderer: QrRenderer,
    cache: Option<IntentCache>,
    fallback: FallbackPolicy,
    metrics: GatewayMetrics,
}

impl CallLinkService {
    pub fn new(config: &GatewayConfig, bridge: Arc<dyn CallBridge>, metrics: GatewayMetrics) -> Self {
        Self {
            dispatcher: CallDispatcher::new(config.credentials.clone(), bridge, metrics.clone()),
            renderer: QrRenderer::new(config.qr_min_dimension),
            cache: config.intent_cache_enabled.then(IntentCache::new),
            fallback: config.token_fallback,
            metrics,
        }
    }

    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }

    pub fn cache(&self) -> Option<&IntentCache> {
        self.cache.as_ref()
    }

    /// Issue a token for `request` and a scannable image of its redemption URL
    pub fn generate(&self, request: &GenerateRequest, base_url: &str) -> Result<GeneratedLink> {
        let phone_number = request.phone_number.as_deref().map(str::trim).unwrap_or("");
        validate_phone_number("Phone number", phone_number)?;
        request.validate().map_err(|_| {
            QrCallError::Validation(format!("Label must be at most {} characters", MAX_LABEL_LEN))
        })?;

        let intent = CallIntent::from_request(phone_number, request.label.as_deref());
        let token = codec::encode_at(&intent.target_number, &intent.label, intent.created_at);
        let call_url = format!("{}/call/{}", base_url.trim_end_matches('/'), token);
        let qr_code = self.renderer.render_data_url(&call_url)?;

        info!(
            target_number = %mask_phone_number(&intent.target_number),
            label = %intent.label,
            "Call link generated"
        );
        self.metrics.tokens_generated.inc();

        let label = intent.label.clone();
        if let Some(cache) = &self.cache {
            cache.insert(&token, intent);
        }

        Ok(GeneratedLink {
            success: true,
            call_id: token,
            qr_code,
            call_url,
            label,
        })
    }

    /// Decode `token` and, when a caller number is supplied, dispatch the call
    pub async fn redeem(&self, token: &str, from: Option<&str>) -> std::result::Result<Redemption, RedeemError> {
        self.metrics.redemptions.inc();

        let intent = match (codec::decode(token), self.fallback) {
            (Ok(intent), _) => intent,
            (Err(e), FallbackPolicy::Placeholder) => {
                self.metrics.invalid_tokens.inc();
                warn!(error = %e, "Undecodable call token, substituting placeholder intent");
                CallIntent::placeholder()
            }
            (Err(e), FallbackPolicy::Reject) => {
                self.metrics.invalid_tokens.inc();
                warn!(error = %e, "Rejected undecodable call token");
                return Err(RedeemError::InvalidToken(e));
            }
        };

        let from = match from.map(str::trim).filter(|f| !f.is_empty()) {
            Some(from) => from,
            None => {
                return Ok(Redemption::AwaitingCallerNumber {
                    token: token.to_string(),
                    intent,
                })
            }
        };

        match self.dispatcher.dispatch(from, &intent).await {
            Ok(outcome) => Ok(Redemption::Dispatched {
                token: token.to_string(),
                intent,
                from: from.to_string(),
                outcome,
            }),
            Err(source) => Err(RedeemError::InvalidCaller {
                token: token.to_string(),
                intent,
                source,
            }),
        }
    }
}
