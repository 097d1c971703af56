//! [`UpstreamService`] realized over the real `video_upstream` client crate.

use std::path::Path;

use video_upstream::Client;

use crate::error::EngineError;
use crate::upstream_service::{ FileHandle, FileState, GenerateConfig, GenerateOutput, UpstreamService };

/// Wraps a [`video_upstream::Client`] to satisfy [`UpstreamService`], translating
/// between the engine's abstract types and the transport crate's wire types.
#[ derive( Debug ) ]
pub struct LiveUpstreamService
{
  client : Client,
}

impl LiveUpstreamService
{
  /// Wrap an already-constructed client.
  #[ must_use ]
  pub fn new( client : Client ) -> Self
  {
    Self { client }
  }
}

fn parse_state( raw : Option< &str > ) -> FileState
{
  match raw
  {
    Some( "ACTIVE" ) => FileState::Active,
    Some( "FAILED" ) => FileState::Failed,
    Some( "PROCESSING" ) => FileState::Processing,
    _ => FileState::Uploading,
  }
}

fn to_handle( meta : video_upstream::FileMetadata ) -> FileHandle
{
  FileHandle
  {
    name : meta.name,
    uri : meta.uri.unwrap_or_default(),
    mime_type : meta.mime_type,
    size_bytes : meta.size_bytes.map_or( 0, | n | n.max( 0 ) as u64 ),
    state : parse_state( meta.state.as_deref() ),
  }
}

#[ async_trait::async_trait ]
impl UpstreamService for LiveUpstreamService
{
  async fn upload( &self, local_path : &Path, display_name : &str, mime_type : &str ) -> Result< FileHandle, EngineError >
  {
    let file_data = tokio::fs::read( local_path ).await
      .map_err( | e | EngineError::FileError( format!( "failed to read {}: {e}", local_path.display() ) ) )?;

    let request = video_upstream::UploadFileRequest
    {
      file_data,
      mime_type : mime_type.to_string(),
      display_name : Some( display_name.to_string() ),
    };

    let response = self.client.files().upload( &request ).await?;
    Ok( to_handle( response.file ) )
  }

  async fn file_state( &self, name : &str ) -> Result< FileHandle, EngineError >
  {
    let meta = self.client.files().get( name ).await?;
    Ok( to_handle( meta ) )
  }

  async fn generate( &self, config : &GenerateConfig, prompt : &str, file : &FileHandle ) -> Result< GenerateOutput, EngineError >
  {
    use video_upstream::{ Content, FileData, GenerateContentRequest, GenerationConfig, Part };

    let request = GenerateContentRequest
    {
      contents : vec!
      [
        Content
        {
          role : "user".to_string(),
          parts : vec!
          [
            Part { text : Some( prompt.to_string() ), inline_data : None, file_data : None, video_metadata : None },
            Part
            {
              text : None,
              inline_data : None,
              file_data : Some( FileData { uri : Some( file.uri.clone() ), mime_type : Some( file.mime_type.clone() ) } ),
              video_metadata : None,
            },
          ],
        },
      ],
      generation_config : Some( GenerationConfig
      {
        temperature : Some( config.temperature ),
        max_output_tokens : Some( i32::try_from( config.max_tokens ).unwrap_or( i32::MAX ) ),
        stop_sequences : None,
      } ),
      safety_settings : None,
      system_instruction : None,
    };

    let response = self.client.generate().generate_content( &config.model, &request ).await?;

    let text = response.candidates
      .first()
      .and_then( | c | c.content.parts.first() )
      .and_then( | p | p.text.clone() )
      .ok_or_else( || EngineError::UpstreamDomainError( "empty generate response".to_string() ) )?;

    if text.trim().is_empty()
    {
      return Err( EngineError::UpstreamDomainError( "empty generate response".to_string() ) );
    }

    Ok( GenerateOutput { text } )
  }

  async fn delete_file( &self, name : &str ) -> Result< (), EngineError >
  {
    self.client.files().delete( name ).await?;
    Ok( () )
  }
}
