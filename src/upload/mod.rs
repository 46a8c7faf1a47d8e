//! Upload gateway: composes a strip and hands it to the remote storage endpoint.

/// Quota-aware upload of saved strips.
pub mod flow;
/// HTTP upload client.
pub mod gateway;
