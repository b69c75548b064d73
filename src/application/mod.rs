//! Application layer orchestrating the payment flow: the request client,
//! the status poller and the provider directory. Data flows one way,
//! directory to client to poller to the caller's status callback.

pub mod client;
pub mod directory;
pub mod poller;
