//! Client side of nodeflow.
//!
//! - [`ProxyClient`]: validates credential shapes and forwards requests to
//!   the proxy through a [`ProxyEndpoint`], returning envelopes and never
//!   faulting
//! - [`NodeConfig`]: the per-node state machine that records the outcome of
//!   the last execution

pub mod endpoint;
pub mod error;
pub mod helper;
pub mod node;
pub mod token;

pub use endpoint::{HttpProxyEndpoint, LocalProxyEndpoint, ProxyEndpoint};
pub use error::{ClientError, NodeStateError, TokenFormatError};
pub use helper::ProxyClient;
pub use node::{ExecutionStatus, LastExecution, NodeConfig};
pub use token::validate_credential;
