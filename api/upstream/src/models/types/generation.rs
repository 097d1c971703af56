//! Content generation request/response types.

use serde::{ Deserialize, Serialize };
use super::content::{ Content, SystemInstruction };

/// Request for generating content using a model.
#[ derive( Debug, Clone, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct GenerateContentRequest
{
  /// The conversation turns sent to the model.
  pub contents : Vec< Content >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Configuration options for model generation.
  pub generation_config : Option< GenerationConfig >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Safety settings for blocking unsafe content.
  pub safety_settings : Option< Vec< SafetySetting > >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// System instruction for the model.
  pub system_instruction : Option< SystemInstruction >,
}

/// Response from content generation.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct GenerateContentResponse
{
  /// Generated content candidates.
  #[ serde( default ) ]
  pub candidates : Vec< super::content::Candidate >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Feedback about why generation stopped or was blocked.
  pub prompt_feedback : Option< PromptFeedback >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Token usage information.
  pub usage_metadata : Option< UsageMetadata >,
}

/// Configuration for how the model generates responses.
#[ derive( Debug, Clone, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct GenerationConfig
{
  /// Controls randomness in generation (0.0 to 1.0).
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  pub temperature : Option< f32 >,

  /// Maximum number of tokens to generate.
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  pub max_output_tokens : Option< i32 >,

  /// Sequences that will stop generation.
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  pub stop_sequences : Option< Vec< String > >,
}

/// Safety setting for blocking content.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct SafetySetting
{
  /// The safety category.
  pub category : String,
  /// The threshold for blocking.
  pub threshold : String,
}

/// Feedback about the prompt.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct PromptFeedback
{
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Reason why the prompt was blocked.
  pub block_reason : Option< String >,
}

/// Token usage statistics for a single generation call.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
#[ serde( rename_all = "camelCase" ) ]
pub struct UsageMetadata
{
  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Number of tokens in the prompt.
  pub prompt_token_count : Option< i32 >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Number of tokens in the candidates.
  pub candidates_token_count : Option< i32 >,

  #[ serde( skip_serializing_if = "Option::is_none" ) ]
  /// Total number of tokens.
  pub total_token_count : Option< i32 >,
}
