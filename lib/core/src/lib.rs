//! Core types and utilities for nodeflow.
//!
//! This crate provides the foundational pieces shared by the proxy, the
//! client helper, and the server: the rootcause-backed `Result` alias,
//! strongly-typed ids, and an injectable clock.

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::Result;
pub use id::{NodeId, ParseIdError, WebhookDeliveryId};
