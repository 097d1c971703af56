//! Client module for interacting with the upstream video-generation service.
//!
//! The client is a thin HTTP wrapper around two endpoints the batch engine
//! needs : uploading a video file and generating content against it. Retry,
//! key rotation, and error classification live one layer up in the engine
//! crate; this crate only retries the transient-network case internally.

mod core;
mod builder;
mod api_interfaces;

mod private
{
  pub use super::core::Client;
  pub use super::builder::ClientBuilder;
  pub use super::api_interfaces::{ FilesApi, GenerateApi };
}

::mod_interface::mod_interface!
{
  exposed use private::Client;
  exposed use private::ClientBuilder;
  exposed use private::FilesApi;
  exposed use private::GenerateApi;
}
