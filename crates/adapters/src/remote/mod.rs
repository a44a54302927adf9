//! Remote API adapters.

/// JSON payload decoding for remote values.
pub mod decode;
/// Blocking reqwest client for the remote API.
pub mod http;

pub use http::{HttpRemoteClient, HttpRemoteClientConfig};
