//! Call Dispatcher
//!
//! Turns a decoded call intent plus the scanner's own number into exactly one
//! outcome. Without usable credentials the dispatcher stays in simulated mode
//! and never touches the network.

use qrcall_core::{mask_phone_number, validate_phone_number, CallIntent, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::bridge::{BridgeCredentials, BridgeRequest, CallBridge};
use crate::metrics::GatewayMetrics;

/// Terminal result of a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Credentials absent: report what would have happened
    Simulated { from: String, to: String, label: String },
    /// Provider accepted the call
    Connected { call_sid: String, status: String },
    /// Provider unreachable or refused
    Failed { error: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Simulated { .. } => "simulated",
            Self::Connected { .. } => "connected",
            Self::Failed { .. } => "failed",
        }
    }
}

pub struct CallDispatcher {
    credentials: BridgeCredentials,
    bridge: Arc<dyn CallBridge>,
    metrics: GatewayMetrics,
}

impl CallDispatcher {
    pub fn new(credentials: BridgeCredentials, bridge: Arc<dyn CallBridge>, metrics: GatewayMetrics) -> Self {
        Self {
            credentials,
            bridge,
            metrics,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    pub fn provider(&self) -> &'static str {
        self.bridge.provider()
    }

    /// Bridge `from` to the intent's target.
    ///
    /// Errors only on malformed numbers; provider failures are reported as
    /// [`DispatchOutcome::Failed`].
    pub async fn dispatch(&self, from: &str, intent: &CallIntent) -> Result<DispatchOutcome> {
        let from = from.trim();
        validate_phone_number("Phone number", from)?;
        validate_phone_number("Target phone number", &intent.target_number)?;

        let caller_id = match (&self.credentials.caller_id, self.is_configured()) {
            (Some(caller_id), true) => caller_id.clone(),
            _ => {
                info!(
                    from = %mask_phone_number(from),
                    to = %mask_phone_number(&intent.target_number),
                    "Telephony not configured, simulating call"
                );
                self.metrics.dispatch_simulated.inc();
                return Ok(DispatchOutcome::Simulated {
                    from: from.to_string(),
                    to: intent.target_number.clone(),
                    label: intent.label.clone(),
                });
            }
        };

        let request = BridgeRequest {
            from: from.to_string(),
            to: intent.target_number.clone(),
            caller_id,
        };

        let started = Instant::now();
        let result = self.bridge.connect(&request).await;
        self.metrics
            .dispatch_latency_ms
            .record(started.elapsed().as_secs_f64() * 1000.0);

        Ok(match result {
            Ok(call) => {
                info!(
                    provider = self.bridge.provider(),
                    call_sid = %call.call_sid,
                    status = %call.status,
                    "Call bridged"
                );
                self.metrics.dispatch_connected.inc();
                DispatchOutcome::Connected {
                    call_sid: call.call_sid,
                    status: call.status,
                }
            }
            Err(e) => {
                warn!(provider = self.bridge.provider(), error = %e, "Call bridge failed");
                self.metrics.dispatch_failed.inc();
                DispatchOutcome::Failed {
                    error: e.user_message(),
                }
            }
        })
    }
}
