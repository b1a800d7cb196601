use qr_call_gateway::{GatewayConfig, QrCallGatewayService};
use qrcall_core::{MicroserviceRuntime, QrCallError, Result, ServiceConfig};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    qrcall_telemetry::init("qr-call-gateway").map_err(|e| QrCallError::Config(e.to_string()))?;

    if let Err(e) = dotenv {
        debug!(error = %e, "No .env file loaded");
    }

    info!("Starting QR Call Gateway");

    let service_config = ServiceConfig::from_env()?;
    let service = Arc::new(QrCallGatewayService::new(
        service_config.clone(),
        GatewayConfig::from_env()?,
    ));
    MicroserviceRuntime::new(service_config).run(service).await
}
