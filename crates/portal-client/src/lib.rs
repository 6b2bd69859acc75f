//! Typed client for the portal HTTP API.
//!
//! Responses are memoized for a fixed TTL and concurrent identical calls
//! share a single request.

mod client;
mod error;

pub use client::{PortalClient, DEFAULT_TTL};
pub use error::ClientError;
