//! End-to-end scenarios exercising the orchestrator against a fake upstream
//! service: quota-exhaustion rotation across two credentials, and a resumed
//! run after an interrupted batch.

use std::path::Path;
use std::sync::atomic::{ AtomicU32, Ordering };
use std::sync::Arc;

use async_trait::async_trait;

use lesson_batch_engine::collaborators::{ InMemoryWriter, NullTemplateStore };
use lesson_batch_engine::model::{ BatchConfig, BatchStatus, TaskStatus };
use lesson_batch_engine::upstream_service::{ FileHandle, FileState, GenerateConfig, GenerateOutput };
use lesson_batch_engine::{ EngineError, Orchestrator, StateStore, UpstreamService };

#[ derive( Debug, Default ) ]
struct QuotaThenSuccessService
{
  calls : AtomicU32,
}

#[ async_trait ]
impl UpstreamService for QuotaThenSuccessService
{
  async fn upload( &self, _local_path : &Path, _display_name : &str, _mime_type : &str ) -> Result< FileHandle, EngineError >
  {
    Ok( FileHandle { name : "files/1".to_string(), uri : "uri://files/1".to_string(), mime_type : "video/mp4".to_string(), size_bytes : 10, state : FileState::Active } )
  }

  async fn file_state( &self, name : &str ) -> Result< FileHandle, EngineError >
  {
    Ok( FileHandle { name : name.to_string(), uri : "uri://files/1".to_string(), mime_type : "video/mp4".to_string(), size_bytes : 10, state : FileState::Active } )
  }

  async fn generate( &self, _config : &GenerateConfig, _prompt : &str, _file : &FileHandle ) -> Result< GenerateOutput, EngineError >
  {
    // Fails for exactly the first caller, regardless of which credential it
    // came from, so one worker sees QuotaExhausted and re-enqueues the task
    // for its sibling, which succeeds on its own attempt.
    if self.calls.fetch_add( 1, Ordering::SeqCst ) == 0
    {
      return Err( EngineError::QuotaExhausted( "quota exceeded".to_string() ) );
    }
    Ok( GenerateOutput { text : "lesson from the second credential".to_string() } )
  }

  async fn delete_file( &self, _name : &str ) -> Result< (), EngineError >
  {
    Ok( () )
  }
}

fn sample_config( dir : &Path ) -> BatchConfig
{
  BatchConfig
  {
    input_dir : dir.to_path_buf(),
    template : "chinese_transcript".to_string(),
    output_dir : dir.join( "out" ),
    worker_cap : 2,
    max_retries : 3,
    skip_existing : false,
    per_task_timeout_secs : 30,
  }
}

#[ tokio::test ]
async fn quota_exhaustion_on_one_credential_rotates_to_the_other()
{
  let dir = tempfile::tempdir().unwrap();
  std::fs::write( dir.path().join( "lecture.mp4" ), b"video bytes" ).unwrap();

  let service : Arc< dyn UpstreamService > = Arc::new( QuotaThenSuccessService::default() );
  let writer = Arc::new( InMemoryWriter::default() );
  let state_store = Arc::new( StateStore::new( dir.path().join( "state" ) ) );
  let orchestrator = Orchestrator::new
  (
    service,
    vec![ "key-one".to_string(), "key-two".to_string() ],
    Arc::new( NullTemplateStore::default() ),
    writer,
    state_store,
    None,
  ).unwrap();

  let batch = orchestrator.create_batch( sample_config( dir.path() ) ).unwrap();
  let summary = orchestrator.run( batch ).await.unwrap();

  assert_eq!( summary.success, 1 );
  assert_eq!( summary.failed, 0 );
}

#[ derive( Debug, Default ) ]
struct AlwaysFailsService;

#[ async_trait ]
impl UpstreamService for AlwaysFailsService
{
  async fn upload( &self, _local_path : &Path, _display_name : &str, _mime_type : &str ) -> Result< FileHandle, EngineError >
  {
    Err( EngineError::NetworkError( "connection reset".to_string() ) )
  }

  async fn file_state( &self, name : &str ) -> Result< FileHandle, EngineError >
  {
    Ok( FileHandle { name : name.to_string(), uri : String::new(), mime_type : "video/mp4".to_string(), size_bytes : 0, state : FileState::Active } )
  }

  async fn generate( &self, _config : &GenerateConfig, _prompt : &str, _file : &FileHandle ) -> Result< GenerateOutput, EngineError >
  {
    Err( EngineError::NetworkError( "connection reset".to_string() ) )
  }

  async fn delete_file( &self, _name : &str ) -> Result< (), EngineError >
  {
    Ok( () )
  }
}

#[ tokio::test ]
async fn interrupted_processing_task_resumes_as_pending()
{
  let dir = tempfile::tempdir().unwrap();
  std::fs::write( dir.path().join( "lecture.mp4" ), b"video bytes" ).unwrap();

  let state_store = Arc::new( StateStore::new( dir.path().join( "state" ) ) );
  let service : Arc< dyn UpstreamService > = Arc::new( AlwaysFailsService );
  let orchestrator = Orchestrator::new
  (
    service,
    vec![ "only-key".to_string() ],
    Arc::new( NullTemplateStore::default() ),
    Arc::new( InMemoryWriter::default() ),
    state_store.clone(),
    None,
  ).unwrap();

  let mut batch = orchestrator.create_batch( sample_config( dir.path() ) ).unwrap();
  // Simulate a process crash mid-task: lease a task, then persist without ever resolving it.
  let task = batch.tasks.values_mut().next().unwrap();
  task.lease( "dead-worker".to_string() );
  assert_eq!( task.status, TaskStatus::Processing );
  state_store.save( &batch ).unwrap();

  let resumed = orchestrator.resume( &batch.id ).unwrap();
  let task = resumed.tasks.values().next().unwrap();
  assert_eq!( task.status, TaskStatus::Pending );
  assert_eq!( task.attempts, 1 );
  assert_eq!( resumed.status, BatchStatus::Running );
}

#[ tokio::test ]
async fn resume_fails_fast_for_an_unknown_batch()
{
  let dir = tempfile::tempdir().unwrap();
  let state_store = Arc::new( StateStore::new( dir.path().join( "state" ) ) );
  let service : Arc< dyn UpstreamService > = Arc::new( AlwaysFailsService );
  let orchestrator = Orchestrator::new
  (
    service,
    vec![ "only-key".to_string() ],
    Arc::new( NullTemplateStore::default() ),
    Arc::new( InMemoryWriter::default() ),
    state_store,
    None,
  ).unwrap();

  assert!( orchestrator.resume( "no-such-batch" ).is_err() );
}

