//! Error Classifier (C1) : maps raw upstream error text to a closed taxonomy
//! and a per-class retry policy.
//!
//! Classification is a pure function of the message text — same input,
//! same output, every time. It never panics: an empty or malformed message
//! classifies to [`ErrorClass::Unknown`] rather than erroring.

use crate::error::EngineError;

/// The closed set of error classes the classifier assigns.
#[ derive( Debug, Clone, Copy, PartialEq, Eq, Hash ) ]
pub enum ErrorClass
{
  /// Transient network failure.
  NetworkError,
  /// HTTP 429 or an equivalent upstream signal.
  RateLimit,
  /// The credential's quota has been exhausted.
  QuotaExhausted,
  /// A local filesystem problem.
  FileError,
  /// Credential rejected by the upstream service.
  AuthError,
  /// Upstream 5xx.
  ServerError,
  /// Upstream 4xx other than auth/rate-limit.
  ClientError,
  /// Content policy rejection, unsupported video, model unavailable.
  UpstreamDomainError,
  /// Did not match any known pattern.
  Unknown,
}

impl ErrorClass
{
  /// Human-readable label, used in retry-history entries and logs.
  #[ must_use ]
  #[ inline ]
  pub fn label( self ) -> &'static str
  {
    match self
    {
      Self::NetworkError => "NetworkError",
      Self::RateLimit => "RateLimit",
      Self::QuotaExhausted => "QuotaExhausted",
      Self::FileError => "FileError",
      Self::AuthError => "AuthError",
      Self::ServerError => "ServerError",
      Self::ClientError => "ClientError",
      Self::UpstreamDomainError => "UpstreamDomainError",
      Self::Unknown => "Unknown",
    }
  }
}

/// Max attempts, base delay, cap delay, exponential base, jitter fraction.
#[ derive( Debug, Clone, Copy, PartialEq ) ]
pub struct RetryPolicy
{
  /// Number of attempts permitted for this class, `0` meaning not retryable.
  pub max_attempts : u32,
  /// Base delay in seconds before exponential growth.
  pub base_delay_secs : f64,
  /// Upper bound on the computed delay, in seconds.
  pub cap_delay_secs : f64,
  /// Exponential growth base.
  pub exp_base : f64,
  /// Fraction of the computed delay added as symmetric jitter.
  pub jitter_fraction : f64,
}

impl RetryPolicy
{
  const NOT_RETRYABLE : Self = Self
  {
    max_attempts : 0,
    base_delay_secs : 0.0,
    cap_delay_secs : 0.0,
    exp_base : 1.0,
    jitter_fraction : 0.0,
  };
}

/// The classifier's verdict on a single error message.
#[ derive( Debug, Clone, Copy, PartialEq ) ]
pub struct Classification
{
  /// The assigned class.
  pub class : ErrorClass,
  /// Whether this class is retryable at all.
  pub retryable : bool,
  /// The policy to apply if retryable.
  pub policy : RetryPolicy,
  /// An explicit "retry after N seconds" hint parsed out of the message, if present.
  pub retry_after_secs : Option< f64 >,
}

/// Maps raw error text to a [`Classification`].
///
/// Grounded in the per-class policy table from the specification; the
/// `unknown_is_retryable` flag lets a caller flip whether [`ErrorClass::Unknown`]
/// is treated as retryable-once (the conservative default) or terminal.
#[ derive( Debug, Clone, Copy ) ]
pub struct Classifier
{
  unknown_is_retryable : bool,
}

impl Default for Classifier
{
  #[ inline ]
  fn default() -> Self
  {
    Self { unknown_is_retryable : true }
  }
}

impl Classifier
{
  /// Construct a classifier with the given `unknown_is_retryable` behavior.
  #[ must_use ]
  #[ inline ]
  pub fn new( unknown_is_retryable : bool ) -> Self
  {
    Self { unknown_is_retryable }
  }

  /// Classify a raw error message.
  #[ must_use ]
  pub fn classify( &self, message : &str ) -> Classification
  {
    let lower = message.to_lowercase();
    let retry_after_secs = parse_retry_after( &lower );

    let ( class, policy ) = if contains_any( &lower, &[ "quota exceeded", "quota exhausted", "quotaexhausted" ] )
    {
      ( ErrorClass::QuotaExhausted, RetryPolicy::NOT_RETRYABLE )
    }
    else if contains_any( &lower, &[ "rate limit", "429", "too many requests" ] )
    {
      ( ErrorClass::RateLimit, RetryPolicy { max_attempts : 3, base_delay_secs : 10.0, cap_delay_secs : 120.0, exp_base : 2.0, jitter_fraction : 0.3 } )
    }
    else if contains_any( &lower, &[ "timeout", "timed out" ] )
    {
      ( ErrorClass::NetworkError, RetryPolicy { max_attempts : 5, base_delay_secs : 2.0, cap_delay_secs : 30.0, exp_base : 1.5, jitter_fraction : 0.2 } )
    }
    else if contains_any( &lower, &[ "network", "connection reset", "dns", "connect error" ] )
    {
      ( ErrorClass::NetworkError, RetryPolicy { max_attempts : 5, base_delay_secs : 2.0, cap_delay_secs : 30.0, exp_base : 1.5, jitter_fraction : 0.2 } )
    }
    else if contains_any( &lower, &[ "no such file", "permission denied", "file not found", "file error" ] )
    {
      ( ErrorClass::FileError, RetryPolicy::NOT_RETRYABLE )
    }
    else if contains_any( &lower, &[ "authentication", "unauthorized", "invalid api key", "401", "403" ] )
    {
      ( ErrorClass::AuthError, RetryPolicy::NOT_RETRYABLE )
    }
    else if contains_any( &lower, &[ "server error", "internal error", "500", "502", "503", "504" ] )
    {
      ( ErrorClass::ServerError, RetryPolicy { max_attempts : 4, base_delay_secs : 5.0, cap_delay_secs : 60.0, exp_base : 2.0, jitter_fraction : 0.1 } )
    }
    else if contains_any( &lower, &[ "content policy", "unsupported video", "model unavailable", "blocked" ] )
    {
      ( ErrorClass::UpstreamDomainError, RetryPolicy::NOT_RETRYABLE )
    }
    else if contains_any( &lower, &[ "bad request", "400", "invalid argument" ] )
    {
      ( ErrorClass::ClientError, RetryPolicy::NOT_RETRYABLE )
    }
    else
    {
      let policy = if self.unknown_is_retryable
      {
        RetryPolicy { max_attempts : 2, base_delay_secs : 3.0, cap_delay_secs : 10.0, exp_base : 1.8, jitter_fraction : 0.1 }
      }
      else
      {
        RetryPolicy::NOT_RETRYABLE
      };
      ( ErrorClass::Unknown, policy )
    };

    Classification
    {
      class,
      retryable : policy.max_attempts > 0,
      policy,
      retry_after_secs,
    }
  }

  /// Classify an already-typed [`EngineError`], delegating to the message-based rules.
  #[ must_use ]
  #[ inline ]
  pub fn classify_error( &self, error : &EngineError ) -> Classification
  {
    self.classify( error.message() )
  }
}

fn contains_any( haystack : &str, needles : &[ &str ] ) -> bool
{
  needles.iter().any( | n | haystack.contains( n ) )
}

/// Parses `retryDelay: '30s'` or a bare `30s` pattern out of a lowercased message.
fn parse_retry_after( lower : &str ) -> Option< f64 >
{
  if let Some( idx ) = lower.find( "retrydelay" )
  {
    if let Some( secs ) = extract_seconds_number( &lower[ idx.. ] )
    {
      return Some( secs );
    }
  }

  extract_seconds_number( lower )
}

/// Extracts the first `<digits>s` occurrence as a float.
fn extract_seconds_number( text : &str ) -> Option< f64 >
{
  let bytes = text.as_bytes();
  let mut i = 0;
  while i < bytes.len()
  {
    if bytes[ i ].is_ascii_digit()
    {
      let start = i;
      while i < bytes.len() && bytes[ i ].is_ascii_digit()
      {
        i += 1;
      }
      if i < bytes.len() && bytes[ i ] == b's'
      {
        return text[ start..i ].parse::< f64 >().ok();
      }
    }
    else
    {
      i += 1;
    }
  }
  None
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn classify_is_deterministic()
  {
    let c = Classifier::default();
    let a = c.classify( "Network timeout while uploading" );
    let b = c.classify( "Network timeout while uploading" );
    assert_eq!( a, b );
  }

  #[ test ]
  fn network_error_is_retryable()
  {
    let c = Classifier::default();
    let v = c.classify( "Network timeout" );
    assert_eq!( v.class, ErrorClass::NetworkError );
    assert!( v.retryable );
    assert_eq!( v.policy.max_attempts, 5 );
  }

  #[ test ]
  fn quota_exhausted_is_terminal()
  {
    let c = Classifier::default();
    let v = c.classify( "429 quota exceeded, retryDelay: '30s'" );
    assert_eq!( v.class, ErrorClass::QuotaExhausted );
    assert!( !v.retryable );
    assert_eq!( v.retry_after_secs, Some( 30.0 ) );
  }

  #[ test ]
  fn unknown_defaults_retryable_once()
  {
    let c = Classifier::default();
    let v = c.classify( "something bizarre happened" );
    assert_eq!( v.class, ErrorClass::Unknown );
    assert!( v.retryable );
    assert_eq!( v.policy.max_attempts, 2 );
  }

  #[ test ]
  fn unknown_can_be_made_terminal()
  {
    let c = Classifier::new( false );
    let v = c.classify( "something bizarre happened" );
    assert_eq!( v.class, ErrorClass::Unknown );
    assert!( !v.retryable );
  }

  #[ test ]
  fn auth_error_is_terminal()
  {
    let c = Classifier::default();
    let v = c.classify( "401 Unauthorized: invalid API key" );
    assert_eq!( v.class, ErrorClass::AuthError );
    assert!( !v.retryable );
  }
}
