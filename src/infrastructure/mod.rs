//! Gateway adapters behind the [`ProviderGateway`] port: a scripted
//! in-process one for tests and demos, and an optional JSON-over-HTTP
//! one for live providers.
//!
//! [`ProviderGateway`]: crate::domain::ports::ProviderGateway

#[cfg(feature = "gateway-http")]
pub mod http;
pub mod simulated;
