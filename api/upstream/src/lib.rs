//! # Video Upstream Client
//!
//! A thin Rust client for the upstream video-generation service used by the
//! batch lesson engine: upload a source video, generate narrated content
//! against it, and manage the uploaded file's lifecycle.
//!
//! ## Governing principle : "Thin Client, Rich API"
//!
//! This client is a transparent window onto the upstream HTTP API: one
//! operation per endpoint, no hidden retries, no client-side intelligence.
//! Retry policy, key rotation, and error-class-driven backoff live one layer
//! up, in the engine crate that drives this client through the
//! `UpstreamService` trait.
//!
//! ## State management policy
//!
//! Runtime-stateful, process-stateless: connection pool and retry counters
//! live for the lifetime of the `Client` and nothing is written to disk here.
//! Persisted batch state is the engine crate's concern, not this crate's.

#![ doc( html_root_url = "https://docs.rs/video_upstream/latest/video_upstream/" ) ]

/// Client module containing the main Client struct and builder pattern.
pub mod client;

/// Request/response data structures mirrored from the upstream wire format.
pub mod models;

/// Error handling types and utilities.
pub mod error;

/// Internal HTTP execution and retry helpers (exposed for testing).
pub mod internal;

/// Input validation utilities for API requests.
pub mod validation;

// Re-export key types at the top level for easier access.
pub use models::*;
pub use client::{ Client, ClientBuilder };
