//! Shared handler state

use qrcall_core::{DependencyStatus, HealthStatus, ReadinessStatus};
use std::sync::Arc;
use std::time::Instant;

use crate::bridge::{CallBridge, ExotelBridge};
use crate::config::GatewayConfig;
use crate::flow::CallLinkService;
use crate::metrics::GatewayMetrics;

pub const SERVICE_ID: &str = "qr-call-gateway";

#[derive(Clone)]
pub struct AppState {
    pub links: Arc<CallLinkService>,
    pub config: Arc<GatewayConfig>,
    pub metrics: GatewayMetrics,
    pub started_at: Instant,
}

impl AppState {
    /// State wired to the Exotel API
    pub fn new(config: GatewayConfig) -> Self {
        let bridge = Arc::new(ExotelBridge::new(
            config.exotel_api_base.clone(),
            config.credentials.account_sid.clone().unwrap_or_default(),
            config.credentials.api_token.clone().unwrap_or_default(),
        ));
        Self::with_bridge(config, bridge)
    }

    pub fn with_bridge(config: GatewayConfig, bridge: Arc<dyn CallBridge>) -> Self {
        let metrics = GatewayMetrics::new();
        Self {
            links: Arc::new(CallLinkService::new(&config, bridge, metrics.clone())),
            config: Arc::new(config),
            metrics,
            started_at: Instant::now(),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: SERVICE_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    /// Always ready: an unconfigured bridge means simulated mode, not an outage
    pub fn readiness(&self) -> ReadinessStatus {
        let dispatcher = self.links.dispatcher();
        let detail = if dispatcher.is_configured() {
            dispatcher.provider().to_string()
        } else {
            "simulated mode".to_string()
        };

        ReadinessStatus {
            ready: true,
            dependencies: vec![DependencyStatus {
                name: "telephony-bridge".to_string(),
                available: true,
                detail: Some(detail),
            }],
        }
    }
}
