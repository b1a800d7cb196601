//! Service lifecycle

use qrcall_core::{GatewayService, HealthStatus, ReadinessStatus, Result, ServiceConfig};
use tracing::info;

use crate::config::GatewayConfig;
use crate::router::build_router;
use crate::state::{AppState, SERVICE_ID};

pub struct QrCallGatewayService {
    service_config: ServiceConfig,
    state: AppState,
}

impl QrCallGatewayService {
    pub fn new(service_config: ServiceConfig, config: GatewayConfig) -> Self {
        Self {
            service_config,
            state: AppState::new(config),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

#[async_trait::async_trait]
impl GatewayService for QrCallGatewayService {
    fn service_id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn health(&self) -> HealthStatus {
        self.state.health()
    }

    async fn ready(&self) -> ReadinessStatus {
        self.state.readiness()
    }

    async fn shutdown(&self) -> Result<()> {
        info!(
            links_generated = self.state.metrics.tokens_generated.get(),
            redemptions = self.state.metrics.redemptions.get(),
            "Shutting down QR call gateway"
        );
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let dispatcher = self.state.links.dispatcher();
        info!(
            bind = %self.service_config.http_bind,
            provider = dispatcher.provider(),
            simulated = !dispatcher.is_configured(),
            token_fallback = ?self.state.config.token_fallback,
            intent_cache = self.state.config.intent_cache_enabled,
            "Starting QR call gateway"
        );

        let app = build_router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(&self.service_config.http_bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
