//! Internal implementation details, exposed for testing.

/// HTTP execution and retry helpers.
pub mod http;
