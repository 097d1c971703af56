//! Key Rotator (C3) : owns N credentials, selects the healthiest for each
//! call, records outcomes, rotates away from failing keys, and persists
//! usage stats.

use std::collections::HashMap;
use std::path::{ Path, PathBuf };
use std::sync::Mutex;
use std::time::{ SystemTime, UNIX_EPOCH };

use serde::{ Deserialize, Serialize };

use crate::error::EngineError;
use crate::persist::{ atomic_write_json, short_fingerprint };

const CONSECUTIVE_FAILURE_THRESHOLD : u32 = 5;
const MIN_REQUESTS_FOR_SUCCESS_RATE : u64 = 10;
const MIN_SUCCESS_RATE : f64 = 0.5;

/// Health status derived from a credential's recent outcomes.
#[ derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize ) ]
#[ serde( rename_all = "snake_case" ) ]
pub enum KeyStatus
{
  /// Healthy and eligible for selection.
  Active,
  /// Exhausted its quota; not eligible until usage is reset externally.
  QuotaExhausted,
  /// Currently rate-limited.
  RateLimited,
  /// Rejected by the upstream service (bad credential).
  Invalid,
  /// No outcomes recorded yet.
  Unknown,
}

/// A short tag describing the outcome of one call, used to derive [`KeyStatus`].
#[ derive( Debug, Clone, Copy, PartialEq, Eq ) ]
pub enum OutcomeTag
{
  /// The call succeeded.
  Success,
  /// The call failed because the credential's quota is exhausted.
  QuotaExhausted,
  /// The call failed because of rate limiting.
  RateLimited,
  /// The call failed because the credential itself was rejected.
  Invalid,
  /// The call failed for some other reason.
  OtherFailure,
}

/// Per-credential counters, persisted to disk on every update.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
pub struct KeyUsageRecord
{
  /// Non-revealing fingerprint identifying this credential.
  pub key_id : String,
  /// Total requests attempted.
  pub total_requests : u64,
  /// Requests that succeeded.
  pub success_requests : u64,
  /// Requests that failed.
  pub fail_requests : u64,
  /// Count of quota-exhausted outcomes.
  pub quota_exhausted_count : u64,
  /// Count of rate-limited outcomes.
  pub rate_limited_count : u64,
  /// Consecutive failures since the last success.
  pub consecutive_failures : u32,
  /// Unix timestamp (seconds) of the last use, if any.
  pub last_used_at : Option< u64 >,
  /// Unix timestamp (seconds) of the last success, if any.
  pub last_success_at : Option< u64 >,
  /// Unix timestamp (seconds) of the last failure, if any.
  pub last_failure_at : Option< u64 >,
  /// Current derived status.
  pub status : KeyStatus,
}

impl KeyUsageRecord
{
  fn new( key_id : String ) -> Self
  {
    Self
    {
      key_id,
      total_requests : 0,
      success_requests : 0,
      fail_requests : 0,
      quota_exhausted_count : 0,
      rate_limited_count : 0,
      consecutive_failures : 0,
      last_used_at : None,
      last_success_at : None,
      last_failure_at : None,
      status : KeyStatus::Unknown,
    }
  }

  fn success_rate( &self ) -> f64
  {
    if self.total_requests == 0
    {
      1.0
    }
    else
    {
      self.success_requests as f64 / self.total_requests as f64
    }
  }

  fn is_healthy( &self ) -> bool
  {
    if self.status == KeyStatus::Invalid
    {
      return false;
    }
    if self.consecutive_failures > CONSECUTIVE_FAILURE_THRESHOLD
    {
      return false;
    }
    if self.total_requests >= MIN_REQUESTS_FOR_SUCCESS_RATE && self.success_rate() < MIN_SUCCESS_RATE
    {
      return false;
    }
    true
  }
}

fn now_secs() -> u64
{
  SystemTime::now().duration_since( UNIX_EPOCH ).map( | d | d.as_secs() ).unwrap_or( 0 )
}

struct Inner
{
  raw_keys : Vec< String >,
  usage : HashMap< String, KeyUsageRecord >,
  current_index : usize,
  usage_path : Option< PathBuf >,
}

/// Owns a pool of API credentials and their health bookkeeping.
///
/// With a single credential configured, selection degenerates to identity
/// plus bookkeeping, matching the specification's single-key mode.
pub struct KeyRotator
{
  inner : Mutex< Inner >,
}

impl std::fmt::Debug for KeyRotator
{
  fn fmt( &self, f : &mut std::fmt::Formatter< '_ > ) -> std::fmt::Result
  {
    f.debug_struct( "KeyRotator" ).finish_non_exhaustive()
  }
}

impl KeyRotator
{
  /// Construct a rotator over `keys`, optionally persisting usage under
  /// `<log_dir>/api_key_usage.json`.
  ///
  /// # Errors
  ///
  /// Returns [`EngineError::ConfigError`] if `keys` is empty.
  pub fn new( keys : Vec< String >, log_dir : Option< &Path > ) -> Result< Self, EngineError >
  {
    if keys.is_empty()
    {
      return Err( EngineError::ConfigError( "at least one API credential is required".to_string() ) );
    }

    let mut usage = HashMap::new();
    for key in &keys
    {
      let id = short_fingerprint( key );
      usage.insert( id.clone(), KeyUsageRecord::new( id ) );
    }

    Ok( Self
    {
      inner : Mutex::new( Inner
      {
        raw_keys : keys,
        usage,
        current_index : 0,
        usage_path : log_dir.map( | d | d.join( "api_key_usage.json" ) ),
      } ),
    } )
  }

  /// Number of configured credentials.
  #[ must_use ]
  pub fn len( &self ) -> usize
  {
    self.inner.lock().expect( "key rotator mutex poisoned" ).raw_keys.len()
  }

  /// Whether no credentials are configured (never true after [`Self::new`] succeeds).
  #[ must_use ]
  pub fn is_empty( &self ) -> bool
  {
    self.len() == 0
  }

  /// Select the healthiest credential, returning `(key_id, raw_key)`.
  ///
  /// Falls back to round-robin over all credentials if none is currently
  /// healthy. Degenerates to the single configured key when there is only one.
  #[ must_use ]
  pub fn select( &self ) -> ( String, String )
  {
    let inner = self.inner.lock().expect( "key rotator mutex poisoned" );
    if inner.raw_keys.len() == 1
    {
      let raw = inner.raw_keys[ 0 ].clone();
      return ( short_fingerprint( &raw ), raw );
    }

    let healthy = inner.raw_keys.iter()
      .filter( | raw | inner.usage.get( &short_fingerprint( raw ) ).map_or( true, KeyUsageRecord::is_healthy ) )
      .min_by( | a, b |
      {
        let ra = inner.usage.get( &short_fingerprint( a ) );
        let rb = inner.usage.get( &short_fingerprint( b ) );
        let key = | r : Option< &KeyUsageRecord > | -> ( u32, i64 )
        {
          r.map_or( ( 0, 0 ), | r | ( r.consecutive_failures, -( ( r.success_rate() * 1_000_000.0 ) as i64 ) ) )
        };
        key( ra ).cmp( &key( rb ) )
      } );

    if let Some( raw ) = healthy
    {
      return ( short_fingerprint( raw ), raw.clone() );
    }

    tracing::warn!( "no healthy credential available, falling back to round-robin" );
    let raw = inner.raw_keys[ inner.current_index % inner.raw_keys.len() ].clone();
    ( short_fingerprint( &raw ), raw )
  }

  /// Record the outcome of a call made with the credential identified by `key_id`.
  pub fn record_outcome( &self, key_id : &str, outcome : OutcomeTag )
  {
    let mut inner = self.inner.lock().expect( "key rotator mutex poisoned" );
    let now = now_secs();
    let usage_path = inner.usage_path.clone();
    if let Some( record ) = inner.usage.get_mut( key_id )
    {
      record.total_requests += 1;
      record.last_used_at = Some( now );
      match outcome
      {
        OutcomeTag::Success =>
        {
          record.success_requests += 1;
          record.consecutive_failures = 0;
          record.last_success_at = Some( now );
          record.status = KeyStatus::Active;
        },
        OutcomeTag::QuotaExhausted =>
        {
          record.fail_requests += 1;
          record.quota_exhausted_count += 1;
          record.consecutive_failures += 1;
          record.last_failure_at = Some( now );
          record.status = KeyStatus::QuotaExhausted;
        },
        OutcomeTag::RateLimited =>
        {
          record.fail_requests += 1;
          record.rate_limited_count += 1;
          record.consecutive_failures += 1;
          record.last_failure_at = Some( now );
          record.status = KeyStatus::RateLimited;
        },
        OutcomeTag::Invalid =>
        {
          record.fail_requests += 1;
          record.consecutive_failures += 1;
          record.last_failure_at = Some( now );
          record.status = KeyStatus::Invalid;
        },
        OutcomeTag::OtherFailure =>
        {
          record.fail_requests += 1;
          record.consecutive_failures += 1;
          record.last_failure_at = Some( now );
        },
      }
    }

    if let Some( path ) = usage_path
    {
      if let Err( e ) = atomic_write_json( &path, &inner.usage )
      {
        tracing::warn!( "failed to persist key usage: {e}" );
      }
    }
  }

  /// Snapshot of the current usage record for a credential, if known.
  #[ must_use ]
  pub fn usage_for( &self, key_id : &str ) -> Option< KeyUsageRecord >
  {
    self.inner.lock().expect( "key rotator mutex poisoned" ).usage.get( key_id ).cloned()
  }

  /// The credential at `index`, wrapping modulo the configured count.
  ///
  /// Used by the orchestrator to assign one fixed credential per pool
  /// worker, independent of health-based [`Self::select`].
  #[ must_use ]
  pub fn key_at( &self, index : usize ) -> ( String, String )
  {
    let inner = self.inner.lock().expect( "key rotator mutex poisoned" );
    let raw = inner.raw_keys[ index % inner.raw_keys.len() ].clone();
    ( short_fingerprint( &raw ), raw )
  }

  /// Advance the round-robin cursor to the next credential, returning its id and raw value.
  pub fn rotate_to_next_key( &self ) -> ( String, String )
  {
    let mut inner = self.inner.lock().expect( "key rotator mutex poisoned" );
    inner.current_index = ( inner.current_index + 1 ) % inner.raw_keys.len();
    let raw = inner.raw_keys[ inner.current_index ].clone();
    ( short_fingerprint( &raw ), raw )
  }
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn single_key_degenerates_to_identity()
  {
    let r = KeyRotator::new( vec![ "only-key".to_string() ], None ).unwrap();
    let ( id1, raw1 ) = r.select();
    let ( id2, raw2 ) = r.select();
    assert_eq!( id1, id2 );
    assert_eq!( raw1, raw2 );
  }

  #[ test ]
  fn rejects_empty_key_list()
  {
    assert!( KeyRotator::new( vec![], None ).is_err() );
  }

  #[ test ]
  fn rotation_trigger_advances_cursor()
  {
    let r = KeyRotator::new( vec![ "k1".to_string(), "k2".to_string() ], None ).unwrap();
    let ( first_id, _ ) = r.rotate_to_next_key();
    let ( second_id, _ ) = r.rotate_to_next_key();
    assert_ne!( first_id, second_id );
  }

  #[ test ]
  fn unhealthy_key_is_avoided_in_favor_of_healthy_one()
  {
    let r = KeyRotator::new( vec![ "k1".to_string(), "k2".to_string() ], None ).unwrap();
    let k1_id = short_fingerprint( "k1" );
    for _ in 0..6
    {
      r.record_outcome( &k1_id, OutcomeTag::OtherFailure );
    }
    let ( selected_id, _ ) = r.select();
    assert_ne!( selected_id, k1_id );
  }

  #[ test ]
  fn usage_persists_to_disk()
  {
    let dir = tempfile::tempdir().unwrap();
    let r = KeyRotator::new( vec![ "k1".to_string() ], Some( dir.path() ) ).unwrap();
    let id = short_fingerprint( "k1" );
    r.record_outcome( &id, OutcomeTag::Success );
    let path = dir.path().join( "api_key_usage.json" );
    assert!( path.exists() );
  }
}
