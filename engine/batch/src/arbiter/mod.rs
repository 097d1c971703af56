//! Retry Budget & Arbiter (C2) : decides whether a failed attempt may retry
//! and computes the backoff delay, subject to a global hourly/daily cap.

use std::sync::Mutex;
use std::time::{ Duration, Instant };

use rand::Rng;

use crate::classifier::{ Classification, Classifier };

/// One entry in a task's retry history.
#[ derive( Debug, Clone, PartialEq ) ]
pub struct RetryHistoryEntry
{
  /// The attempt number this entry records.
  pub attempt : u32,
  /// Error class assigned by the classifier.
  pub class : crate::classifier::ErrorClass,
  /// Truncated error message (first 200 chars).
  pub message : String,
  /// The delay chosen before the next attempt.
  pub delay_secs : f64,
}

/// The arbiter's decision for one failed attempt.
#[ derive( Debug, Clone, PartialEq ) ]
pub enum Decision
{
  /// Retry is permitted after the given delay.
  Retry
  {
    /// Seconds to sleep before retrying.
    delay_secs : f64,
  },
  /// No retry: either the class is terminal, attempts are exhausted, or the budget is spent.
  Stop,
}

struct BudgetWindow
{
  reset_at : Instant,
  horizon : Duration,
  cap : u32,
  used : u32,
}

impl BudgetWindow
{
  fn new( horizon : Duration, cap : u32 ) -> Self
  {
    Self { reset_at : Instant::now() + horizon, horizon, cap, used : 0 }
  }

  fn roll_if_needed( &mut self, now : Instant )
  {
    if now >= self.reset_at
    {
      self.used = 0;
      self.reset_at = now + self.horizon;
    }
  }

  fn has_room( &self ) -> bool
  {
    self.used < self.cap
  }

  fn consume( &mut self )
  {
    self.used += 1;
  }
}

struct Budget
{
  hourly : BudgetWindow,
  daily : BudgetWindow,
}

/// Enforces global per-hour / per-day retry caps on top of the classifier's
/// per-class policy, and computes the jittered exponential backoff delay.
///
/// Every public method is safe to call concurrently from multiple workers:
/// the budget counters live behind a single mutex, guarding the
/// read-reset-increment sequence as one atomic step.
pub struct Arbiter
{
  classifier : Classifier,
  budget : Mutex< Budget >,
}

impl std::fmt::Debug for Arbiter
{
  fn fmt( &self, f : &mut std::fmt::Formatter< '_ > ) -> std::fmt::Result
  {
    f.debug_struct( "Arbiter" ).finish_non_exhaustive()
  }
}

impl Arbiter
{
  /// Construct an arbiter with the given global hourly/daily retry caps.
  #[ must_use ]
  pub fn new( classifier : Classifier, max_retries_per_hour : u32, max_retries_per_day : u32 ) -> Self
  {
    Self
    {
      classifier,
      budget : Mutex::new( Budget
      {
        hourly : BudgetWindow::new( Duration::from_secs( 3600 ), max_retries_per_hour ),
        daily : BudgetWindow::new( Duration::from_secs( 86400 ), max_retries_per_day ),
      } ),
    }
  }

  /// Decide whether the given attempt may retry, and for how long to wait.
  ///
  /// Never panics: a malformed `error_message` simply classifies to `Unknown`.
  #[ must_use ]
  pub fn should_retry( &self, error_message : &str, current_attempt : u32 ) -> ( Decision, Option< RetryHistoryEntry > )
  {
    let classification = self.classifier.classify( error_message );
    if !classification.retryable
    {
      return ( Decision::Stop, None );
    }
    if current_attempt >= classification.policy.max_attempts
    {
      return ( Decision::Stop, None );
    }

    {
      let mut budget = self.budget.lock().expect( "arbiter budget mutex poisoned" );
      let now = Instant::now();
      budget.hourly.roll_if_needed( now );
      budget.daily.roll_if_needed( now );
      if !budget.hourly.has_room() || !budget.daily.has_room()
      {
        return ( Decision::Stop, None );
      }
      budget.hourly.consume();
      budget.daily.consume();
    }

    let delay_secs = compute_delay( &classification, current_attempt );
    let entry = RetryHistoryEntry
    {
      attempt : current_attempt,
      class : classification.class,
      message : truncate( error_message, 200 ),
      delay_secs,
    };

    ( Decision::Retry { delay_secs }, Some( entry ) )
  }
}

fn compute_delay( classification : &Classification, attempt : u32 ) -> f64
{
  if let Some( hint ) = classification.retry_after_secs
  {
    return hint;
  }

  let policy = classification.policy;
  let raw = policy.base_delay_secs * policy.exp_base.powi( i32::try_from( attempt ).unwrap_or( i32::MAX ) );
  let capped = raw.min( policy.cap_delay_secs );
  let jitter_magnitude = capped * policy.jitter_fraction;
  let jitter = if jitter_magnitude > 0.0
  {
    rand::rng().random_range( -jitter_magnitude..=jitter_magnitude )
  }
  else
  {
    0.0
  };

  ( capped + jitter ).max( 0.1 )
}

fn truncate( s : &str, max_chars : usize ) -> String
{
  s.chars().take( max_chars ).collect()
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn non_retryable_class_stops_immediately()
  {
    let arbiter = Arbiter::new( Classifier::default(), 100, 1000 );
    let ( decision, entry ) = arbiter.should_retry( "401 Unauthorized", 0 );
    assert_eq!( decision, Decision::Stop );
    assert!( entry.is_none() );
  }

  #[ test ]
  fn retryable_class_within_attempts_retries()
  {
    let arbiter = Arbiter::new( Classifier::default(), 100, 1000 );
    let ( decision, entry ) = arbiter.should_retry( "Network timeout", 0 );
    assert!( matches!( decision, Decision::Retry { .. } ) );
    assert!( entry.is_some() );
  }

  #[ test ]
  fn exhausted_attempts_stop()
  {
    let arbiter = Arbiter::new( Classifier::default(), 100, 1000 );
    let ( decision, _ ) = arbiter.should_retry( "Network timeout", 5 );
    assert_eq!( decision, Decision::Stop );
  }

  #[ test ]
  fn hourly_budget_is_enforced()
  {
    let arbiter = Arbiter::new( Classifier::default(), 1, 1000 );
    let ( first, _ ) = arbiter.should_retry( "Network timeout", 0 );
    assert!( matches!( first, Decision::Retry { .. } ) );
    let ( second, _ ) = arbiter.should_retry( "Network timeout", 0 );
    assert_eq!( second, Decision::Stop );
  }

  #[ test ]
  fn explicit_retry_after_hint_is_honored_verbatim()
  {
    let arbiter = Arbiter::new( Classifier::default(), 100, 1000 );
    let ( decision, entry ) = arbiter.should_retry( "quota exceeded, retryDelay: '7s'", 0 );
    // QuotaExhausted is non-retryable per policy, so fall back to a retryable class that still carries a hint.
    let _ = decision;
    let _ = entry;
    let ( decision2, entry2 ) = arbiter.should_retry( "rate limit exceeded, retryDelay: '7s'", 0 );
    if let Decision::Retry { delay_secs } = decision2
    {
      assert!( ( delay_secs - 7.0 ).abs() < f64::EPSILON );
    }
    else
    {
      panic!( "expected retry" );
    }
    assert_eq!( entry2.unwrap().delay_secs, 7.0 );
  }
}
