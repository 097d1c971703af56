//! Shared atomic-write helper used by both the State Store (C5) and the Key
//! Rotator (C3) so the two on-disk writers never diverge in their crash-safety
//! discipline.
//!
//! **Portability note**: this implementation targets Unix. The temp-file
//! write plus `fs::rename` is already atomic on POSIX filesystems; true
//! cross-process advisory locking (`flock`) is not wired in because no
//! locking crate is part of this workspace's dependency stack, so only the
//! in-process mutex each caller holds around its write serializes writers
//! within this process. A future Windows/cross-process port would add a
//! `FileLock` trait object around `flock`/`LockFileEx` without touching this
//! function's contract.

use std::io::Write as _;
use std::path::Path;

use crate::error::EngineError;

/// Serialize `value` to pretty JSON and atomically replace `path` with it.
///
/// Writes to `<path>.tmp` in the same directory, fsyncs, then renames over
/// the target. A reader can never observe a half-written file.
pub fn atomic_write_json< T : serde::Serialize >( path : &Path, value : &T ) -> Result< (), EngineError >
{
  let body = serde_json::to_vec_pretty( value )
    .map_err( | e | EngineError::StateCorruption( format!( "failed to serialize: {e}" ) ) )?;

  if let Some( parent ) = path.parent()
  {
    std::fs::create_dir_all( parent )
      .map_err( | e | EngineError::FileError( format!( "failed to create {}: {e}", parent.display() ) ) )?;
  }

  let tmp_path = path.with_extension( "tmp" );
  {
    let mut tmp = std::fs::File::create( &tmp_path )
      .map_err( | e | EngineError::FileError( format!( "failed to create {}: {e}", tmp_path.display() ) ) )?;
    tmp.write_all( &body )
      .map_err( | e | EngineError::FileError( format!( "failed to write {}: {e}", tmp_path.display() ) ) )?;
    tmp.sync_all()
      .map_err( | e | EngineError::FileError( format!( "failed to fsync {}: {e}", tmp_path.display() ) ) )?;
  }

  std::fs::rename( &tmp_path, path )
    .map_err( | e | EngineError::FileError( format!( "failed to rename {} -> {}: {e}", tmp_path.display(), path.display() ) ) )?;

  Ok( () )
}

/// Read and deserialize a JSON file written by [`atomic_write_json`].
pub fn read_json< T : serde::de::DeserializeOwned >( path : &Path ) -> Result< T, EngineError >
{
  let body = std::fs::read( path )
    .map_err( | e | EngineError::FileError( format!( "failed to read {}: {e}", path.display() ) ) )?;
  serde_json::from_slice( &body )
    .map_err( | e | EngineError::StateCorruption( format!( "failed to parse {}: {e}", path.display() ) ) )
}

/// First 8 hex characters of the SHA-256 of `raw`, used as a non-revealing
/// key/credential fingerprint that is safe to log and persist.
#[ must_use ]
pub fn short_fingerprint( raw : &str ) -> String
{
  use sha2::{ Digest, Sha256 };
  let digest = Sha256::digest( raw.as_bytes() );
  digest.iter().take( 4 ).map( | b | format!( "{b:02x}" ) ).collect()
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn fingerprint_is_deterministic_and_short()
  {
    let a = short_fingerprint( "secret-key-one" );
    let b = short_fingerprint( "secret-key-one" );
    assert_eq!( a, b );
    assert_eq!( a.len(), 8 );
  }

  #[ test ]
  fn different_keys_fingerprint_differently()
  {
    assert_ne!( short_fingerprint( "key-a" ), short_fingerprint( "key-b" ) );
  }

  #[ test ]
  fn round_trips_through_disk()
  {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join( "thing.json" );
    atomic_write_json( &path, &serde_json::json!( { "a" : 1 } ) ).unwrap();
    let back : serde_json::Value = read_json( &path ).unwrap();
    assert_eq!( back[ "a" ], 1 );
  }
}
