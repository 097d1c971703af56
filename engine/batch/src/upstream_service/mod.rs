//! The abstract upstream service seam (§6): the orchestrator and adapter
//! depend only on [`UpstreamService`], never on `reqwest` or `video_upstream`
//! types directly, so tests can substitute an in-memory fake.

mod live;

pub use live::LiveUpstreamService;

use crate::error::EngineError;

/// Processing state of an uploaded file on the upstream service.
#[ derive( Debug, Clone, Copy, PartialEq, Eq ) ]
pub enum FileState
{
  /// Upload is still in progress.
  Uploading,
  /// Upload complete, server-side processing in progress.
  Processing,
  /// Ready to be referenced in a generate call.
  Active,
  /// Processing failed.
  Failed,
}

/// A handle to an uploaded file, as reported by the upstream service.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct FileHandle
{
  /// Opaque file name/id on the upstream service.
  pub name : String,
  /// URI to reference this file in a generate call.
  pub uri : String,
  /// MIME type of the uploaded content.
  pub mime_type : String,
  /// Size in bytes.
  pub size_bytes : u64,
  /// Current processing state.
  pub state : FileState,
}

/// Generation parameters for one generate call.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct GenerateConfig
{
  /// Model id to call.
  pub model : String,
  /// Sampling temperature.
  pub temperature : f32,
  /// Maximum output tokens.
  pub max_tokens : u32,
}

/// The text output of a generate call.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct GenerateOutput
{
  /// The generated text.
  pub text : String,
}

/// The abstract upstream inference service interface (§6).
///
/// Any implementation — the real `video_upstream` client, or an in-memory
/// fake for tests — must provide these four operations.
#[ async_trait::async_trait ]
pub trait UpstreamService : Send + Sync
{
  /// Upload a local file, returning its handle.
  async fn upload( &self, local_path : &std::path::Path, display_name : &str, mime_type : &str ) -> Result< FileHandle, EngineError >;

  /// Fetch the current state of a previously uploaded file.
  async fn file_state( &self, name : &str ) -> Result< FileHandle, EngineError >;

  /// Issue a generate call against an uploaded file.
  async fn generate( &self, config : &GenerateConfig, prompt : &str, file : &FileHandle ) -> Result< GenerateOutput, EngineError >;

  /// Best-effort delete of an uploaded file.
  async fn delete_file( &self, name : &str ) -> Result< (), EngineError >;
}
