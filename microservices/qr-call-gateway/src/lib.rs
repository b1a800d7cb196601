//! QR Call Gateway
//!
//! Turns a phone number into a scannable call link and bridges the call
//! when the link is redeemed:
//! - Stateless call tokens carrying the target number and label
//! - SVG QR codes for redemption URLs
//! - Outbound bridging through Exotel, or a simulated mode without credentials

pub mod bridge;
pub mod cache;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod flow;
pub mod handlers;
pub mod metrics;
pub mod pages;
pub mod qr;
pub mod router;
pub mod service;
pub mod state;

#[cfg(test)]
mod test_support;

pub use bridge::{BridgeCredentials, CallBridge, ExotelBridge};
pub use config::GatewayConfig;
pub use flow::{CallLinkService, GenerateRequest, GeneratedLink, Redemption};
pub use router::build_router;
pub use service::QrCallGatewayService;
pub use state::AppState;
