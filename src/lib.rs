//! Asynchronous payment request and status-reconciliation engine for
//! QR-code e-wallet checkouts.
//!
//! A [`application::directory::ProviderDirectory`] routes a
//! [`domain::payment::PaymentRequest`] to a provider gateway, the
//! [`application::client::PaymentClient`] normalizes the accepted
//! receipt into a [`domain::payment::UnifiedTransaction`], and the
//! [`application::poller::StatusPoller`] observes settlement until a
//! terminal state, the polling budget, or cancellation ends the run.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
