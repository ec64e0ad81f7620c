//! Shared primitive types used across the compliance engine.

/// Stable customer identifier, assigned by the onboarding flow upstream.
pub type CustomerId = String;

/// Stable transaction identifier.
pub type TransactionId = String;

/// Unix timestamp in seconds (UTC). `chrono` types at the API surface,
/// seconds in the store.
pub type UnixSeconds = i64;
