//! nodeflow HTTP server.
//!
//! Exposes the provider proxy as one JSON route per provider and receives
//! GitHub, Gmail and YouTube webhooks.

pub mod app;
pub mod config;
pub mod error;
pub mod webhooks;
