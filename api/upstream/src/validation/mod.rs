//! Input validation utilities for generate-content requests.
//!
//! Validation functions ensure requests are well-formed before they are sent
//! to the upstream service, catching obvious mistakes without making a
//! network round trip.

use crate::models::*;

/// Validation error types for input validation.
#[ derive( Debug, Clone ) ]
pub enum ValidationError
{
  /// Required field is missing or empty.
  RequiredFieldMissing
  {
    /// The name of the field that is missing.
    field : String,
    /// Context where the validation occurred.
    context : String,
  },

  /// Collection is empty when it should contain items.
  EmptyCollection
  {
    /// The name of the collection field.
    field : String,
    /// Context where the validation occurred.
    context : String,
  },
}

impl core::fmt::Display for ValidationError
{
  fn fmt( &self, f : &mut core::fmt::Formatter< '_ > ) -> core::fmt::Result
  {
    match self
    {
      ValidationError::RequiredFieldMissing { field, context } =>
        write!( f, "Required field '{field}' is missing or empty in {context}" ),

      ValidationError::EmptyCollection { field, context } =>
        write!( f, "Collection '{field}' cannot be empty in {context}" ),
    }
  }
}

impl core::error::Error for ValidationError
{
}

/// Validate a model id.
///
/// # Errors
///
/// Returns [`ValidationError::RequiredFieldMissing`] if the model id is blank.
pub fn validate_model_name( model_name : &str ) -> Result< (), ValidationError >
{
  if model_name.trim().is_empty()
  {
    return Err( ValidationError::RequiredFieldMissing {
      field : "model_name".to_string(),
      context : "model validation".to_string(),
    } );
  }

  Ok( () )
}

/// Validate a generate-content request has at least one non-empty content part.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyCollection`] if `contents` or any
/// content's `parts` is empty.
pub fn validate_content( content : &Content ) -> Result< (), ValidationError >
{
  if content.parts.is_empty()
  {
    return Err( ValidationError::EmptyCollection {
      field : "parts".to_string(),
      context : "Content".to_string(),
    } );
  }

  for part in &content.parts
  {
    validate_part( part )?;
  }

  Ok( () )
}

/// Validate a content part carries at least one of text, inline data, or a
/// file reference.
///
/// # Errors
///
/// Returns [`ValidationError::RequiredFieldMissing`] if the part is empty.
pub fn validate_part( part : &Part ) -> Result< (), ValidationError >
{
  let has_text = part.text.as_ref().is_some_and( | t | !t.trim().is_empty() );
  let has_inline_data = part.inline_data.is_some();
  let has_file_data = part.file_data.is_some();

  if !has_text && !has_inline_data && !has_file_data
  {
    return Err( ValidationError::RequiredFieldMissing {
      field : "content".to_string(),
      context : "Part must have at least one of text, inline_data, or file_data".to_string(),
    } );
  }

  Ok( () )
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn blank_model_name_is_rejected()
  {
    assert!( validate_model_name( "   " ).is_err() );
    assert!( validate_model_name( "gemini-2.5-pro" ).is_ok() );
  }

  #[ test ]
  fn content_with_no_parts_is_rejected()
  {
    let content = Content { role : "user".to_string(), parts : vec![] };
    assert!( matches!( validate_content( &content ), Err( ValidationError::EmptyCollection { .. } ) ) );
  }

  #[ test ]
  fn part_needs_at_least_one_payload()
  {
    let empty = Part { text : None, inline_data : None, file_data : None, video_metadata : None };
    assert!( validate_part( &empty ).is_err() );

    let with_text = Part { text : Some( "hello".to_string() ), inline_data : None, file_data : None, video_metadata : None };
    assert!( validate_part( &with_text ).is_ok() );
  }
}
