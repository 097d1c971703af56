//! Batch execution engine for turning local video files into lesson
//! artifacts against a video-capable inference API.
//!
//! The six components making up the engine each own one concern and compose
//! through narrow interfaces: [`classifier`] turns raw upstream error text
//! into a closed taxonomy, [`arbiter`] decides whether a failure may retry
//! and enforces a global retry budget, [`key_rotator`] owns credential
//! health and selection, [`adapter`] drives one task's upload/poll/generate
//! sequence against a bound credential, [`state_store`] persists batch
//! progress durably and atomically, and [`orchestrator`] ties the rest
//! together into a resumable worker pool.

pub mod adapter;
pub mod arbiter;
pub mod classifier;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod key_rotator;
pub mod model;
pub mod orchestrator;
pub mod output_path;
pub mod persist;
pub mod state_store;
pub mod upstream_service;

pub use adapter::UpstreamAdapter;
pub use arbiter::Arbiter;
pub use classifier::Classifier;
pub use config::discover_api_keys;
pub use error::EngineError;
pub use key_rotator::KeyRotator;
pub use model::{ Batch, BatchConfig, Task, TaskStatus };
pub use orchestrator::{ BatchSummary, Orchestrator };
pub use state_store::StateStore;
pub use upstream_service::UpstreamService;
