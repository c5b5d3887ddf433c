//! Error plumbing shared across nodeflow crates.
//!
//! Crates define their own error enums (`ProxyError`, `TransportError`,
//! `ClientError`, ...). Where an error crosses a seam that wants layered
//! context, it travels as a `rootcause::Report` through this alias.

use rootcause::Report;

/// Result carrying a rootcause report with context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
