//! Gateway configuration

use qrcall_core::{QrCallError, Result};

use crate::bridge::exotel::DEFAULT_API_BASE;
use crate::bridge::BridgeCredentials;
use crate::codec::FallbackPolicy;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base for redemption URLs; derived from the request when unset
    pub public_base_url: Option<String>,
    pub token_fallback: FallbackPolicy,
    pub intent_cache_enabled: bool,
    pub qr_min_dimension: u32,
    pub exotel_api_base: String,
    pub credentials: BridgeCredentials,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            public_base_url: None,
            token_fallback: FallbackPolicy::Reject,
            intent_cache_enabled: false,
            qr_min_dimension: 240,
            exotel_api_base: DEFAULT_API_BASE.to_string(),
            credentials: BridgeCredentials::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let token_fallback = match std::env::var("TOKEN_FALLBACK") {
            Ok(v) => v.parse::<FallbackPolicy>().map_err(QrCallError::Config)?,
            Err(_) => FallbackPolicy::Reject,
        };

        let qr_min_dimension = match std::env::var("QR_MIN_DIMENSION") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|e| QrCallError::Config(format!("Invalid QR_MIN_DIMENSION: {}", e)))?,
            Err(_) => 240,
        };

        // EXOTEL_SUBDOMAIN selects a regional cluster, e.g. api.in.exotel.com
        let exotel_api_base = std::env::var("EXOTEL_API_BASE")
            .ok()
            .or_else(|| {
                std::env::var("EXOTEL_SUBDOMAIN")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| format!("https://{}", s.trim()))
            })
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .ok()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            token_fallback,
            intent_cache_enabled: std::env::var("INTENT_CACHE_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            qr_min_dimension,
            exotel_api_base,
            credentials: BridgeCredentials::from_env(),
        })
    }
}
