//! Per-key upload quotas.

/// Per-key usage counters.
pub mod usage;
