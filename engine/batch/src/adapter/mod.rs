//! Upstream Adapter (C4) : thin per-job driver. upload -> poll -> generate,
//! reporting outcomes back to the Key Rotator and rendering the prompt
//! through the `TemplateStore` collaborator.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{ AtomicU32, Ordering };
use std::sync::Mutex;
use std::time::{ Duration, Instant };

use crate::classifier::{ Classifier, ErrorClass };
use crate::collaborators::TemplateStore;
use crate::error::EngineError;
use crate::key_rotator::{ KeyRotator, OutcomeTag };
use crate::upstream_service::{ FileHandle, FileState, GenerateConfig, UpstreamService };

const POLL_INTERVAL : Duration = Duration::from_secs( 10 );
const DEFAULT_POLL_TIMEOUT : Duration = Duration::from_secs( 600 );
const DEFAULT_DAILY_QUOTA : u32 = 100;
const DEFAULT_GENERATE_RETRIES : u32 = 3;

/// The result of successfully processing one task end-to-end.
#[ derive( Debug, Clone ) ]
pub struct AnalysisResult
{
  /// The generated lesson text.
  pub content : String,
  /// Everything about how this result was produced.
  pub metadata : AnalysisMetadata,
}

/// Metadata attached to an [`AnalysisResult`].
#[ derive( Debug, Clone ) ]
pub struct AnalysisMetadata
{
  /// Model id that produced this result.
  pub model : String,
  /// Prompt template name used.
  pub template : String,
  /// Upstream file identity (name) used for this generation.
  pub file_name : String,
  /// Wall-clock seconds the whole operation took.
  pub processing_secs : f64,
  /// Number of attempts consumed internally by the adapter's own retry loop.
  pub attempts : u32,
  /// The process-wide daily request counter value after this task.
  pub requests_used : u32,
  /// Fingerprint of the credential used.
  pub credential_id : String,
}

/// Per-task input needed by the adapter beyond the task's own fields.
#[ derive( Debug, Clone ) ]
pub struct TemplateParams
{
  /// Named parameters passed to [`TemplateStore::render`].
  pub params : HashMap< String, String >,
}

/// A process-wide daily request counter, representative of a free-tier quota.
#[ derive( Debug ) ]
pub struct QuotaCounter
{
  cap : u32,
  used : AtomicU32,
}

impl QuotaCounter
{
  /// Construct a counter with the given daily cap.
  #[ must_use ]
  pub fn new( cap : u32 ) -> Self
  {
    Self { cap, used : AtomicU32::new( 0 ) }
  }

  /// Consume one unit, returning its new value, or an error if the cap is reached.
  fn consume( &self ) -> Result< u32, EngineError >
  {
    let previous = self.used.fetch_add( 1, Ordering::SeqCst );
    if previous >= self.cap
    {
      self.used.fetch_sub( 1, Ordering::SeqCst );
      return Err( EngineError::QuotaExhausted( format!( "daily request cap of {} reached", self.cap ) ) );
    }
    Ok( previous + 1 )
  }
}

impl Default for QuotaCounter
{
  fn default() -> Self
  {
    Self::new( DEFAULT_DAILY_QUOTA )
  }
}

/// Maps a video file extension to its MIME type. Unknown extensions default
/// to `video/mp4` since every supported extension is already a video.
#[ must_use ]
pub fn mime_type_for( path : &Path ) -> &'static str
{
  match path.extension().and_then( | e | e.to_str() ).unwrap_or( "" ).to_lowercase().as_str()
  {
    "mov" => "video/quicktime",
    "avi" => "video/x-msvideo",
    "mkv" => "video/x-matroska",
    "webm" => "video/webm",
    "m4v" => "video/x-m4v",
    _ => "video/mp4",
  }
}

/// Executes one task's upload -> poll -> generate -> cleanup sequence.
pub struct UpstreamAdapter
{
  service : std::sync::Arc< dyn UpstreamService >,
  rotator : std::sync::Arc< KeyRotator >,
  template_store : std::sync::Arc< dyn TemplateStore >,
  classifier : Classifier,
  quota : QuotaCounter,
  poll_timeout : Duration,
  generate_retries : u32,
  multi_key : bool,
  active_key : Mutex< ( String, String ) >,
}

impl std::fmt::Debug for UpstreamAdapter
{
  fn fmt( &self, f : &mut std::fmt::Formatter< '_ > ) -> std::fmt::Result
  {
    f.debug_struct( "UpstreamAdapter" ).finish_non_exhaustive()
  }
}

impl UpstreamAdapter
{
  /// Construct an adapter that picks its own credential via the rotator and
  /// may rotate internally on `QuotaExhausted`, for standalone use of C4
  /// outside the orchestrator's one-worker-one-credential pool model.
  #[ must_use ]
  pub fn new
  (
    service : std::sync::Arc< dyn UpstreamService >,
    rotator : std::sync::Arc< KeyRotator >,
    template_store : std::sync::Arc< dyn TemplateStore >,
  ) -> Self
  {
    let multi_key = rotator.len() > 1;
    let active_key = rotator.select();
    Self
    {
      service,
      rotator,
      template_store,
      classifier : Classifier::default(),
      quota : QuotaCounter::default(),
      poll_timeout : DEFAULT_POLL_TIMEOUT,
      generate_retries : DEFAULT_GENERATE_RETRIES,
      multi_key,
      active_key : Mutex::new( active_key ),
    }
  }

  /// Construct an adapter permanently bound to one credential.
  ///
  /// This is what the orchestrator's worker pool uses: one worker, one
  /// credential, for the worker's entire lifetime — internal
  /// `QuotaExhausted` rotation is disabled here even if `rotator` knows
  /// about other credentials, since reassigning a task to a different
  /// credential is the orchestrator's job (done by re-enqueuing the task for
  /// a different worker), not this adapter's.
  #[ must_use ]
  pub fn bound_to
  (
    service : std::sync::Arc< dyn UpstreamService >,
    rotator : std::sync::Arc< KeyRotator >,
    template_store : std::sync::Arc< dyn TemplateStore >,
    key_id : String,
    raw_key : String,
  ) -> Self
  {
    Self
    {
      service,
      rotator,
      template_store,
      classifier : Classifier::default(),
      quota : QuotaCounter::default(),
      poll_timeout : DEFAULT_POLL_TIMEOUT,
      generate_retries : DEFAULT_GENERATE_RETRIES,
      multi_key : false,
      active_key : Mutex::new( ( key_id, raw_key ) ),
    }
  }

  /// Override the per-task poll timeout (default 600s) and the generate
  /// retry cap (default 3), matching the specification's configurable knobs.
  #[ must_use ]
  pub fn with_timeouts( mut self, poll_timeout : Duration, generate_retries : u32 ) -> Self
  {
    self.poll_timeout = poll_timeout;
    self.generate_retries = generate_retries;
    self
  }

  fn current_key_id( &self ) -> String
  {
    self.active_key.lock().expect( "adapter key mutex poisoned" ).0.clone()
  }

  fn rotate( &self )
  {
    let next = self.rotator.rotate_to_next_key();
    *self.active_key.lock().expect( "adapter key mutex poisoned" ) = next;
  }

  /// Process one task end-to-end: upload, poll, generate, cleanup.
  ///
  /// # Errors
  ///
  /// Returns a classified [`EngineError`]; callers pass its message through
  /// [`crate::classifier::Classifier`] again only if they need the
  /// `Classification`, since this function already reports outcomes to the
  /// rotator internally.
  pub async fn process
  (
    &self,
    video_path : &Path,
    template : &str,
    template_params : &TemplateParams,
  )
  -> Result< AnalysisResult, EngineError >
  {
    let started = Instant::now();
    let display_name = video_path.file_name().map_or_else( || "video".to_string(), | n | n.to_string_lossy().into_owned() );
    let mime_type = mime_type_for( video_path );

    let mut requests_used = self.quota.consume()?;
    let key_id = self.current_key_id();
    let upload_result = self.service.upload( video_path, &display_name, mime_type ).await;
    let handle = match upload_result
    {
      Ok( h ) => { self.rotator.record_outcome( &key_id, OutcomeTag::Success ); h },
      Err( e ) => { self.report_failure( &key_id, &e ); return Err( e ); },
    };

    let active = self.poll_until_active( &handle.name, &mut requests_used, &key_id ).await?;

    let model_config = self.template_store.model_config( template )
      .map_err( EngineError::ConfigError )?;
    let prompt = self.template_store.render( template, &template_params.params )
      .map_err( EngineError::ConfigError )?;

    let generate_config = GenerateConfig { model : model_config.model.clone(), temperature : model_config.temperature, max_tokens : model_config.max_tokens };

    let ( output, attempts, final_key_id ) = self.generate_with_retry( &generate_config, &prompt, &active, &mut requests_used ).await?;

    // best-effort cleanup; failures here never affect the task outcome.
    if let Err( e ) = self.service.delete_file( &handle.name ).await
    {
      tracing::warn!( "failed to clean up uploaded file {}: {e}", handle.name );
    }

    Ok( AnalysisResult
    {
      content : output.text,
      metadata : AnalysisMetadata
      {
        model : generate_config.model,
        template : template.to_string(),
        file_name : handle.name,
        processing_secs : started.elapsed().as_secs_f64(),
        attempts,
        requests_used,
        credential_id : final_key_id,
      },
    } )
  }

  async fn poll_until_active( &self, file_name : &str, requests_used : &mut u32, key_id : &str ) -> Result< FileHandle, EngineError >
  {
    let deadline = Instant::now() + self.poll_timeout;
    loop
    {
      *requests_used = self.quota.consume()?;
      match self.service.file_state( file_name ).await
      {
        Ok( handle ) if handle.state == FileState::Active =>
        {
          self.rotator.record_outcome( key_id, OutcomeTag::Success );
          return Ok( handle );
        },
        Ok( handle ) if handle.state == FileState::Failed =>
        {
          let err = EngineError::UpstreamDomainError( format!( "upload processing failed for {file_name}" ) );
          self.report_failure( key_id, &err );
          return Err( err );
        },
        Ok( _ ) =>
        {
          if Instant::now() >= deadline
          {
            let err = EngineError::TimeoutError( format!( "timed out waiting for {file_name} to become ACTIVE" ) );
            self.report_failure( key_id, &err );
            return Err( err );
          }
          tokio::time::sleep( POLL_INTERVAL ).await;
        },
        Err( e ) =>
        {
          self.report_failure( key_id, &e );
          let classification = self.classifier.classify_error( &e );
          if !classification.retryable || Instant::now() >= deadline
          {
            return Err( e );
          }
          tokio::time::sleep( POLL_INTERVAL ).await;
        },
      }
    }
  }

  async fn generate_with_retry
  (
    &self,
    config : &GenerateConfig,
    prompt : &str,
    file : &FileHandle,
    requests_used : &mut u32,
  )
  -> Result< ( crate::upstream_service::GenerateOutput, u32, String ), EngineError >
  {
    let mut attempts = 0;
    let mut last_err = None;

    while attempts < self.generate_retries
    {
      attempts += 1;
      *requests_used = self.quota.consume()?;
      let key_id = self.current_key_id();

      match self.service.generate( config, prompt, file ).await
      {
        Ok( output ) =>
        {
          self.rotator.record_outcome( &key_id, OutcomeTag::Success );
          return Ok( ( output, attempts, key_id ) );
        },
        Err( e ) =>
        {
          self.report_failure( &key_id, &e );
          let classification = self.classifier.classify_error( &e );

          if classification.class == ErrorClass::QuotaExhausted && self.multi_key
          {
            self.rotate();
            last_err = Some( e );
            continue;
          }

          if !classification.retryable
          {
            return Err( e );
          }

          if let Some( hint ) = classification.retry_after_secs
          {
            tokio::time::sleep( Duration::from_secs_f64( hint ) ).await;
          }
          last_err = Some( e );
        },
      }
    }

    Err( last_err.unwrap_or_else( || EngineError::Unknown( "generate retries exhausted".to_string() ) ) )
  }

  fn report_failure( &self, key_id : &str, error : &EngineError )
  {
    let classification = self.classifier.classify_error( error );
    let tag = match classification.class
    {
      ErrorClass::QuotaExhausted => OutcomeTag::QuotaExhausted,
      ErrorClass::RateLimit => OutcomeTag::RateLimited,
      ErrorClass::AuthError => OutcomeTag::Invalid,
      _ => OutcomeTag::OtherFailure,
    };
    self.rotator.record_outcome( key_id, tag );
  }
}

#[ cfg( test ) ]
mod tests
{
  use super::*;
  use std::path::PathBuf;

  #[ test ]
  fn mime_type_is_derived_from_extension()
  {
    assert_eq!( mime_type_for( &PathBuf::from( "a.MOV" ) ), "video/quicktime" );
    assert_eq!( mime_type_for( &PathBuf::from( "a.mp4" ) ), "video/mp4" );
    assert_eq!( mime_type_for( &PathBuf::from( "a.unknown" ) ), "video/mp4" );
  }

  #[ test ]
  fn quota_counter_fails_fast_once_exhausted()
  {
    let q = QuotaCounter::new( 2 );
    assert!( q.consume().is_ok() );
    assert!( q.consume().is_ok() );
    assert!( q.consume().is_err() );
  }
}
