//! QR Call Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait the gateway implements
//! - Call intent and phone number domain types
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{QrCallError, Result};
pub use service::{DependencyStatus, GatewayService, HealthStatus, MicroserviceRuntime, ReadinessStatus};
