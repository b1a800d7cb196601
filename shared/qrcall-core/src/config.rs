//! Configuration management for services

use crate::error::{QrCallError, Result};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        http_bind
            .parse::<SocketAddr>()
            .map_err(|e| QrCallError::Config(format!("Invalid HTTP_BIND: {}", e)))?;

        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "qr-call-gateway".to_string()),
            http_bind,
        })
    }
}
