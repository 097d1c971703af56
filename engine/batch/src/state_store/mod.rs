//! State Store (C5) : durable, atomic, integrity-checked snapshot of a
//! batch's task list and per-task status.

use std::collections::HashMap;
use std::path::{ Path, PathBuf };
use std::sync::Mutex;

use serde::{ Deserialize, Serialize };
use sha2::{ Digest, Sha256 };

use crate::error::EngineError;
use crate::model::{ Batch, BatchStats, STATE_SCHEMA_VERSION, TaskStatus };
use crate::persist::{ atomic_write_json, read_json };

/// The metadata envelope wrapping every persisted batch.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
pub struct Envelope
{
  /// Schema version of `batch` at the time it was written.
  pub version : u32,
  /// Unix timestamp (seconds) this snapshot was saved.
  pub saved_at : u64,
  /// SHA-256 over the sorted-key canonical JSON of `batch`.
  pub checksum : String,
  /// The batch payload.
  pub batch : Batch,
}

/// A lightweight summary used by [`StateStore::list`], avoiding a full parse
/// of every task in every state file.
#[ derive( Debug, Clone ) ]
pub struct StateFileSummary
{
  /// Batch id.
  pub id : String,
  /// Current status.
  pub status : crate::model::BatchStatus,
  /// Per-status counts.
  pub stats : BatchStats,
  /// Unix timestamp (seconds) the batch was created.
  pub created_at : u64,
}

fn canonical_checksum( batch : &Batch ) -> Result< String, EngineError >
{
  // Serialize through a `serde_json::Value` first so map keys are emitted in
  // sorted order regardless of `HashMap` iteration order, matching the
  // "SHA-256 over the payload with sorted keys" contract.
  let value = serde_json::to_value( batch )
    .map_err( | e | EngineError::StateCorruption( format!( "failed to canonicalize batch: {e}" ) ) )?;
  let sorted : serde_json::Value = serde_json::from_str( &canonical_string( &value ) )
    .map_err( | e | EngineError::StateCorruption( format!( "failed to canonicalize batch: {e}" ) ) )?;
  let bytes = serde_json::to_vec( &sorted )
    .map_err( | e | EngineError::StateCorruption( format!( "failed to canonicalize batch: {e}" ) ) )?;
  Ok( format!( "{:x}", Sha256::digest( &bytes ) ) )
}

/// Re-emits a `serde_json::Value` with every object's keys sorted, recursively.
fn canonical_string( value : &serde_json::Value ) -> String
{
  fn sort( value : &serde_json::Value ) -> serde_json::Value
  {
    match value
    {
      serde_json::Value::Object( map ) =>
      {
        let mut sorted = serde_json::Map::new();
        let mut keys : Vec< _ > = map.keys().cloned().collect();
        keys.sort();
        for k in keys
        {
          sorted.insert( k.clone(), sort( &map[ &k ] ) );
        }
        serde_json::Value::Object( sorted )
      },
      serde_json::Value::Array( items ) => serde_json::Value::Array( items.iter().map( sort ).collect() ),
      other => other.clone(),
    }
  }
  sort( value ).to_string()
}

/// Durable, crash-safe persistence of [`Batch`] snapshots under `state_dir`.
///
/// One reentrant in-process lock per batch id guards the
/// read-modify-write sequence each public method performs.
pub struct StateStore
{
  state_dir : PathBuf,
  locks : Mutex< HashMap< String, std::sync::Arc< Mutex< () > > > >,
}

impl std::fmt::Debug for StateStore
{
  fn fmt( &self, f : &mut std::fmt::Formatter< '_ > ) -> std::fmt::Result
  {
    f.debug_struct( "StateStore" ).field( "state_dir", &self.state_dir ).finish()
  }
}

impl StateStore
{
  /// Construct a store rooted at `state_dir`, creating it if needed.
  #[ must_use ]
  pub fn new( state_dir : impl Into< PathBuf > ) -> Self
  {
    Self { state_dir : state_dir.into(), locks : Mutex::new( HashMap::new() ) }
  }

  fn path_for( &self, batch_id : &str ) -> PathBuf
  {
    self.state_dir.join( format!( "{batch_id}_state.json" ) )
  }

  /// The on-disk path a batch's state file lives (or would live) at, for
  /// callers that need to display it without performing any I/O.
  #[ must_use ]
  pub fn path_for_display( &self, batch_id : &str ) -> PathBuf
  {
    self.path_for( batch_id )
  }

  fn lock_for( &self, batch_id : &str ) -> std::sync::Arc< Mutex< () > >
  {
    self.locks.lock().expect( "state store lock registry poisoned" )
      .entry( batch_id.to_string() )
      .or_insert_with( | | std::sync::Arc::new( Mutex::new( () ) ) )
      .clone()
  }

  /// Atomically persist `batch`.
  ///
  /// # Errors
  ///
  /// Returns [`EngineError::StateCorruption`] if serialization fails, or
  /// [`EngineError::FileError`] if the write itself fails. Either is fatal
  /// to the run per the specification's error-propagation policy.
  pub fn save( &self, batch : &Batch ) -> Result< (), EngineError >
  {
    let lock = self.lock_for( &batch.id );
    let _guard = lock.lock().expect( "per-batch state lock poisoned" );

    let checksum = canonical_checksum( batch )?;
    let envelope = Envelope
    {
      version : STATE_SCHEMA_VERSION,
      saved_at : crate::model::now_secs(),
      checksum,
      batch : batch.clone(),
    };

    atomic_write_json( &self.path_for( &batch.id ), &envelope )
  }

  /// Load a previously saved batch, re-verifying its checksum.
  ///
  /// A checksum mismatch or unreadable file is treated as corruption: this
  /// returns `Ok(None)` with a warning logged, never an error, since a
  /// corrupt state file is "batch simply unloadable", not a fatal condition
  /// for the caller.
  ///
  /// After a successful load, every `Pending`/`Processing` task's recorded
  /// content hash is re-checked against the file on disk; mismatches are
  /// returned alongside the batch so the orchestrator can decide whether to
  /// re-run or skip them, rather than silently failing the load.
  pub fn load( &self, batch_id : &str ) -> Result< Option< ( Batch, Vec< String > ) >, EngineError >
  {
    let lock = self.lock_for( batch_id );
    let _guard = lock.lock().expect( "per-batch state lock poisoned" );

    let path = self.path_for( batch_id );
    if !path.exists()
    {
      return Ok( None );
    }

    let envelope : Envelope = match read_json( &path )
    {
      Ok( e ) => e,
      Err( e ) =>
      {
        tracing::warn!( "state file for {batch_id} failed to parse: {e}" );
        return Ok( None );
      },
    };

    if envelope.version > STATE_SCHEMA_VERSION
    {
      return Err( EngineError::StateCorruption( format!( "state file version {} is newer than supported version {}", envelope.version, STATE_SCHEMA_VERSION ) ) );
    }

    let recomputed = canonical_checksum( &envelope.batch )?;
    if recomputed != envelope.checksum
    {
      tracing::warn!( "checksum mismatch loading batch {batch_id}: expected {}, got {recomputed}", envelope.checksum );
      return Ok( None );
    }

    let mut modified = Vec::new();
    for task in envelope.batch.tasks.values()
    {
      if matches!( task.status, TaskStatus::Pending | TaskStatus::Processing ) && task.video_path.exists()
      {
        if let Ok( current_hash ) = hash_file( &task.video_path )
        {
          if current_hash != task.content_hash
          {
            modified.push( task.id.clone() );
          }
        }
      }
    }

    Ok( Some( ( envelope.batch, modified ) ) )
  }

  /// List all batches under `state_dir`, newest first.
  #[ must_use ]
  pub fn list( &self ) -> Vec< StateFileSummary >
  {
    let mut summaries = Vec::new();
    let Ok( entries ) = std::fs::read_dir( &self.state_dir ) else { return summaries };

    for entry in entries.flatten()
    {
      let path = entry.path();
      if path.extension().and_then( | e | e.to_str() ) != Some( "json" )
      {
        continue;
      }
      if let Ok( envelope ) = read_json::< Envelope >( &path )
      {
        summaries.push( StateFileSummary
        {
          id : envelope.batch.id.clone(),
          status : envelope.batch.status,
          stats : envelope.batch.stats(),
          created_at : envelope.batch.created_at,
        } );
      }
    }

    summaries.sort_by( | a, b | b.created_at.cmp( &a.created_at ) );
    summaries
  }

  /// Delete a batch's state file.
  pub fn delete( &self, batch_id : &str ) -> Result< (), EngineError >
  {
    let path = self.path_for( batch_id );
    if path.exists()
    {
      std::fs::remove_file( &path )
        .map_err( | e | EngineError::FileError( format!( "failed to delete {}: {e}", path.display() ) ) )?;
    }
    Ok( () )
  }

  /// Copy a batch's current state file into an `archive/` subdirectory, timestamped.
  pub fn checkpoint( &self, batch_id : &str ) -> Result< PathBuf, EngineError >
  {
    let src = self.path_for( batch_id );
    let archive_dir = self.state_dir.join( "archive" );
    std::fs::create_dir_all( &archive_dir )
      .map_err( | e | EngineError::FileError( format!( "failed to create {}: {e}", archive_dir.display() ) ) )?;
    let dest = archive_dir.join( format!( "{batch_id}_{}.json", crate::model::now_secs() ) );
    std::fs::copy( &src, &dest )
      .map_err( | e | EngineError::FileError( format!( "failed to checkpoint {batch_id}: {e}" ) ) )?;
    Ok( dest )
  }

  /// Remove state files whose batch is older than `older_than_days`, returning the count removed.
  #[ must_use ]
  pub fn cleanup( &self, older_than_days : u64 ) -> usize
  {
    let cutoff = crate::model::now_secs().saturating_sub( older_than_days * 86400 );
    let mut removed = 0;
    let Ok( entries ) = std::fs::read_dir( &self.state_dir ) else { return removed };
    for entry in entries.flatten()
    {
      let path = entry.path();
      if path.extension().and_then( | e | e.to_str() ) != Some( "json" )
      {
        continue;
      }
      if let Ok( meta ) = entry.metadata()
      {
        if let Ok( modified ) = meta.modified()
        {
          let modified_secs = modified.duration_since( std::time::UNIX_EPOCH ).map( | d | d.as_secs() ).unwrap_or( 0 );
          if modified_secs < cutoff && std::fs::remove_file( &path ).is_ok()
          {
            removed += 1;
          }
        }
      }
    }
    removed
  }
}

fn hash_file( path : &Path ) -> Result< String, EngineError >
{
  use std::io::Read as _;
  let mut file = std::fs::File::open( path )
    .map_err( | e | EngineError::FileError( format!( "failed to open {}: {e}", path.display() ) ) )?;
  let mut hasher = Sha256::new();
  let mut buf = [ 0u8; 65536 ];
  loop
  {
    let n = file.read( &mut buf )
      .map_err( | e | EngineError::FileError( format!( "failed to read {}: {e}", path.display() ) ) )?;
    if n == 0
    {
      break;
    }
    hasher.update( &buf[ ..n ] );
  }
  Ok( format!( "{:x}", hasher.finalize() ) )
}

/// Streaming SHA-256 of a file on disk, in 64 KiB chunks.
///
/// # Errors
///
/// Returns [`EngineError::FileError`] if the file cannot be opened or read.
pub fn hash_video_file( path : &Path ) -> Result< String, EngineError >
{
  hash_file( path )
}

#[ cfg( test ) ]
mod tests
{
  use super::*;
  use crate::model::{ BatchConfig, Task };
  use std::path::PathBuf;

  fn sample_batch( id : &str ) -> Batch
  {
    let config = BatchConfig
    {
      input_dir : PathBuf::from( "in" ),
      template : "tmpl".to_string(),
      output_dir : PathBuf::from( "out" ),
      worker_cap : 2,
      max_retries : 3,
      skip_existing : false,
      per_task_timeout_secs : 360,
    };
    let mut batch = Batch::new( id.to_string(), config );
    let task = Task::new( "t1".to_string(), PathBuf::from( "nonexistent.mp4" ), "tmpl".to_string(), PathBuf::from( "out/tmpl/nonexistent.md" ), "deadbeef".to_string(), 3 );
    batch.tasks.insert( task.id.clone(), task );
    batch
  }

  #[ test ]
  fn save_then_load_round_trips()
  {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new( dir.path() );
    let batch = sample_batch( "batch-1" );
    store.save( &batch ).unwrap();

    let ( loaded, modified ) = store.load( "batch-1" ).unwrap().unwrap();
    assert_eq!( loaded.id, batch.id );
    assert_eq!( loaded.tasks.len(), batch.tasks.len() );
    assert!( modified.is_empty() );
  }

  #[ test ]
  fn load_missing_batch_returns_none()
  {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new( dir.path() );
    assert!( store.load( "nope" ).unwrap().is_none() );
  }

  #[ test ]
  fn corrupted_checksum_is_detected_and_list_skips_it()
  {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new( dir.path() );
    let batch = sample_batch( "batch-2" );
    store.save( &batch ).unwrap();

    // tamper with the tasks map after save.
    let path = dir.path().join( "batch-2_state.json" );
    let mut envelope : serde_json::Value = serde_json::from_slice( &std::fs::read( &path ).unwrap() ).unwrap();
    envelope[ "batch" ][ "tasks" ][ "t1" ][ "content_hash" ] = serde_json::json!( "tampered" );
    std::fs::write( &path, serde_json::to_vec_pretty( &envelope ).unwrap() ).unwrap();

    assert!( store.load( "batch-2" ).unwrap().is_none() );
    assert!( store.list().is_empty() );
  }

  #[ test ]
  fn list_sorts_newest_first()
  {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new( dir.path() );
    let mut older = sample_batch( "older" );
    older.created_at = 100;
    let mut newer = sample_batch( "newer" );
    newer.created_at = 200;
    store.save( &older ).unwrap();
    store.save( &newer ).unwrap();

    let summaries = store.list();
    assert_eq!( summaries[ 0 ].id, "newer" );
    assert_eq!( summaries[ 1 ].id, "older" );
  }
}
