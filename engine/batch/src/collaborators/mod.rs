//! The two out-of-scope collaborators the Upstream Adapter depends on but
//! does not implement: the prompt-template store and the lesson file writer.
//!
//! Both ship a test double here so the adapter and orchestrator are
//! independently testable without the real front-end.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Per-template model settings.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct ModelSettings
{
  /// Model id to call, e.g. `gemini-2.5-pro`.
  pub model : String,
  /// Sampling temperature.
  pub temperature : f32,
  /// Maximum output tokens.
  pub max_tokens : u32,
}

/// A read-only collaborator that renders a named template with parameters
/// into a text prompt plus per-template model settings.
pub trait TemplateStore : Send + Sync
{
  /// Render `template_name` against `params` into prompt text.
  fn render( &self, template_name : &str, params : &HashMap< String, String > ) -> Result< String, String >;

  /// Model settings associated with `template_name`.
  fn model_config( &self, template_name : &str ) -> Result< ModelSettings, String >;
}

/// The outcome of a write attempt.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct WriteResult
{
  /// Whether the write succeeded.
  pub ok : bool,
  /// The path written to.
  pub path : std::path::PathBuf,
  /// Bytes written, if successful.
  pub size : u64,
  /// Error message, if unsuccessful.
  pub error : Option< String >,
}

/// Consumes analysis text and emits the final Markdown artifact, creating
/// parent directories as needed.
pub trait LessonWriter : Send + Sync
{
  /// Write `content` to `path`.
  fn write( &self, path : &Path, content : &str ) -> WriteResult;
}

/// A [`TemplateStore`] test double that always renders the params verbatim
/// and returns a fixed [`ModelSettings`], for adapter/orchestrator tests
/// that don't care about prompt rendering itself.
#[ derive( Debug, Clone ) ]
pub struct NullTemplateStore
{
  settings : ModelSettings,
}

impl Default for NullTemplateStore
{
  fn default() -> Self
  {
    Self { settings : ModelSettings { model : "gemini-2.5-pro".to_string(), temperature : 0.7, max_tokens : 8192 } }
  }
}

impl TemplateStore for NullTemplateStore
{
  fn render( &self, template_name : &str, params : &HashMap< String, String > ) -> Result< String, String >
  {
    let mut pairs : Vec< _ > = params.iter().collect();
    pairs.sort_by_key( | ( k, _ ) | ( *k ).clone() );
    let body = pairs.into_iter().map( | ( k, v ) | format!( "{k}={v}" ) ).collect::< Vec< _ > >().join( "; " );
    Ok( format!( "[{template_name}] {body}" ) )
  }

  fn model_config( &self, _template_name : &str ) -> Result< ModelSettings, String >
  {
    Ok( self.settings.clone() )
  }
}

/// A [`LessonWriter`] test double that writes into an in-memory map instead
/// of the filesystem, for tests that want to assert on output without
/// touching disk.
#[ derive( Debug, Default ) ]
pub struct InMemoryWriter
{
  written : Mutex< HashMap< std::path::PathBuf, String > >,
}

impl InMemoryWriter
{
  /// Contents written at `path`, if any.
  #[ must_use ]
  pub fn get( &self, path : &Path ) -> Option< String >
  {
    self.written.lock().expect( "writer mutex poisoned" ).get( path ).cloned()
  }
}

impl LessonWriter for InMemoryWriter
{
  fn write( &self, path : &Path, content : &str ) -> WriteResult
  {
    self.written.lock().expect( "writer mutex poisoned" ).insert( path.to_path_buf(), content.to_string() );
    WriteResult { ok : true, path : path.to_path_buf(), size : content.len() as u64, error : None }
  }
}

/// A [`LessonWriter`] that writes through to the real filesystem, creating
/// parent directories as needed.
#[ derive( Debug, Default ) ]
pub struct FsWriter;

impl LessonWriter for FsWriter
{
  fn write( &self, path : &Path, content : &str ) -> WriteResult
  {
    if let Some( parent ) = path.parent()
    {
      if let Err( e ) = std::fs::create_dir_all( parent )
      {
        return WriteResult { ok : false, path : path.to_path_buf(), size : 0, error : Some( e.to_string() ) };
      }
    }
    match std::fs::write( path, content )
    {
      Ok( () ) => WriteResult { ok : true, path : path.to_path_buf(), size : content.len() as u64, error : None },
      Err( e ) => WriteResult { ok : false, path : path.to_path_buf(), size : 0, error : Some( e.to_string() ) },
    }
  }
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn in_memory_writer_round_trips()
  {
    let writer = InMemoryWriter::default();
    let result = writer.write( Path::new( "out/a.md" ), "hello" );
    assert!( result.ok );
    assert_eq!( writer.get( Path::new( "out/a.md" ) ).as_deref(), Some( "hello" ) );
  }

  #[ test ]
  fn null_template_store_renders_params()
  {
    let store = NullTemplateStore::default();
    let mut params = HashMap::new();
    params.insert( "name".to_string(), "lecture".to_string() );
    let rendered = store.render( "chinese_transcript", &params ).unwrap();
    assert_eq!( rendered, "[chinese_transcript] name=lecture" );
  }
}
