//! Provider proxy for nodeflow.
//!
//! This crate provides:
//!
//! - **Requests**: the loose per-provider wire requests and the tagged
//!   [`ActionRequest`] that carries any of them
//! - **Descriptors**: one static [`ProviderDescriptor`] per provider, naming
//!   its auth convention, fixed headers and error-message location
//! - **Dispatcher**: [`Proxy`], which validates, sends through an
//!   [`HttpTransport`], and maps every outcome onto the [`ActionResult`]
//!   envelope
//! - **Mock transport**: [`MockTransport`] for exercising providers offline

pub mod credential;
pub mod descriptor;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod mock;
pub mod providers;
pub mod proxy;
pub mod request;
pub mod transport;

pub use credential::{AuthScheme, CredentialKind};
pub use descriptor::{Provider, ProviderDescriptor};
pub use endpoints::Endpoints;
pub use envelope::{ActionResult, ProxyResponse};
pub use error::{ProxyError, ProxyErrorKind, TransportError};
pub use mock::MockTransport;
pub use proxy::{Prepared, ProviderAction, ProviderRequest, Proxy, Upstream};
pub use request::{
    ActionRequest, AiRequest, DiscordRequest, DriveRequest, GmailRequest, LinkedinRequest,
    TwitterRequest, YoutubeRequest,
};
pub use transport::{HttpMethod, HttpTransport, ReqwestTransport, RequestBody, UpstreamRequest, UpstreamResponse};
