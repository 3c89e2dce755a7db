//! ODsay public-transport routing client.
//!
//! Implements [`RoutingProvider`](crate::finder::RoutingProvider). The API
//! key is supplied per call so the finder can rotate keys across retries.

mod client;
mod types;

pub use client::{OdsayClient, OdsayConfig, interpret};
