//! Garage management HTTP client
//!
//! Uniform request dispatch for the browser-facing garage management
//! modules: one call surface per verb, shared defaults (timeout,
//! anti-forgery token header), the generic API response envelope, and a
//! multipart upload variant with progress reporting.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{GarageClient, GarageClientBuilder, Payload, RequestSpec};
pub use types::{ApiEnvelope, SessionConfig};
