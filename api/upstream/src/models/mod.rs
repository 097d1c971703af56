//! Type definitions and API operations for the upstream video-generation
//! service.

/// Type definitions organized by functional domain.
pub mod types;

mod private
{
  pub use super::types::generation::*;
  pub use super::types::file::*;
  pub use super::types::content::*;
}

::mod_interface::mod_interface!
{
  // Content generation types
  exposed use private::GenerateContentRequest;
  exposed use private::GenerateContentResponse;
  exposed use private::GenerationConfig;
  exposed use private::SafetySetting;
  exposed use private::PromptFeedback;
  exposed use private::UsageMetadata;

  // File management types
  exposed use private::FileMetadata;
  exposed use private::VideoMetadata;
  exposed use private::UploadFileRequest;
  exposed use private::UploadFileResponse;
  exposed use private::ListFilesRequest;
  exposed use private::ListFilesResponse;
  exposed use private::DeleteFileRequest;

  // Content structure types
  exposed use private::Content;
  exposed use private::Part;
  exposed use private::Blob;
  exposed use private::FileData;
  exposed use private::Candidate;
  exposed use private::SafetyRating;
  exposed use private::SystemInstruction;
}
