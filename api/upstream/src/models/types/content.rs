//! Content structure types for the upstream generate-content endpoint.

use serde::{ Deserialize, Serialize };
use super::file::VideoMetadata;

/// Content in a conversation turn.
#[ derive( Debug, Clone, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct Content
{
  /// Parts that make up the content.
  #[ serde( default ) ]
  pub parts : Vec< Part >,
  /// Role of the content creator (`"user"` or `"model"`).
  pub role : String,
}

/// A part of content : either text or a reference to an uploaded file.
#[ derive( Debug, Clone, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct Part
{
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Text content.
  pub text : Option< String >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Inline binary data blob.
  pub inline_data : Option< Blob >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Reference to a previously-uploaded file.
  pub file_data : Option< FileData >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Video-specific metadata for video content.
  pub video_metadata : Option< VideoMetadata >,
}

/// Binary data with MIME type.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct Blob
{
  /// MIME type of the data.
  pub mime_type : String,
  /// Base64-encoded data.
  pub data : String,
}

/// Reference to an uploaded file by URI.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct FileData
{
  /// File URI returned by the upload endpoint.
  pub uri : Option< String >,
  /// MIME type of the file.
  pub mime_type : Option< String >,
}

/// A response candidate from the model.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct Candidate
{
  /// Generated content.
  pub content : Content,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Reason why generation stopped.
  pub finish_reason : Option< String >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Safety ratings for the content.
  pub safety_ratings : Option< Vec< SafetyRating > >,
}

/// Safety rating for generated content.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct SafetyRating
{
  /// The safety category.
  pub category : String,
  /// Probability level of the category.
  pub probability : String,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Whether content was blocked.
  pub blocked : Option< bool >,
}

/// System instruction with structured content.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct SystemInstruction
{
  /// Role of the system instruction (typically `"system"`).
  pub role : String,
  /// Parts containing the system instruction content.
  pub parts : Vec< Part >,
}
