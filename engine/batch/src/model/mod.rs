//! The Task/Batch data model (§3): tagged records replacing the dynamic
//! dictionaries the original implementation passed around.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{ SystemTime, UNIX_EPOCH };

use serde::{ Deserialize, Serialize };

/// Current schema version for the persisted batch state envelope.
pub const STATE_SCHEMA_VERSION : u32 = 1;

/// One (video file -> lesson artifact) unit of work.
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
pub struct Task
{
  /// Stable id, unique within the owning batch.
  pub id : String,
  /// Absolute path to the source video.
  pub video_path : PathBuf,
  /// Name of the prompt template to render for this task.
  pub template : String,
  /// Where the lesson artifact will be (or was) written.
  pub output_path : PathBuf,
  /// SHA-256 of the video contents, captured at task creation.
  pub content_hash : String,
  /// Number of attempts made so far.
  #[ serde( default ) ]
  pub attempts : u32,
  /// Maximum attempts permitted before the task is failed outright.
  #[ serde( default = "default_max_attempts" ) ]
  pub max_attempts : u32,
  /// Id of the worker currently holding this task's lease, if any.
  #[ serde( default ) ]
  pub worker_id : Option< String >,
  /// Unix timestamp (seconds) this task started its current attempt.
  #[ serde( default ) ]
  pub started_at : Option< u64 >,
  /// Unix timestamp (seconds) this task reached a terminal state.
  #[ serde( default ) ]
  pub completed_at : Option< u64 >,
  /// The last error message observed, if any.
  #[ serde( default ) ]
  pub last_error : Option< String >,
  /// Wall-clock seconds the most recent successful attempt took.
  #[ serde( default ) ]
  pub processing_duration_secs : Option< f64 >,
  /// Fingerprint of the credential that produced the current/last result.
  #[ serde( default ) ]
  pub credential_id : Option< String >,
  /// Current lifecycle status.
  #[ serde( default ) ]
  pub status : TaskStatus,
}

fn default_max_attempts() -> u32
{
  3
}

/// Lifecycle status of a [`Task`].
#[ derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "snake_case" ) ]
pub enum TaskStatus
{
  /// Waiting to be leased by a worker.
  #[ default ]
  Pending,
  /// Leased by a worker and in flight.
  Processing,
  /// Completed successfully.
  Success,
  /// Exhausted attempts, or failed with a non-retryable error.
  Failed,
  /// Output already existed; the task was never executed.
  Skipped,
  /// Cancelled by a shutdown or explicit cancel.
  Cancelled,
}

impl TaskStatus
{
  /// Whether this status is terminal (no further transitions expected).
  #[ must_use ]
  #[ inline ]
  pub fn is_terminal( self ) -> bool
  {
    matches!( self, Self::Success | Self::Failed | Self::Skipped | Self::Cancelled )
  }
}

impl Task
{
  /// Construct a new, pending task.
  #[ must_use ]
  pub fn new( id : String, video_path : PathBuf, template : String, output_path : PathBuf, content_hash : String, max_attempts : u32 ) -> Self
  {
    Self
    {
      id,
      video_path,
      template,
      output_path,
      content_hash,
      attempts : 0,
      max_attempts,
      worker_id : None,
      started_at : None,
      completed_at : None,
      last_error : None,
      processing_duration_secs : None,
      credential_id : None,
      status : TaskStatus::Pending,
    }
  }

  /// Whether this task may still be retried (it has not exhausted its attempt budget).
  #[ must_use ]
  #[ inline ]
  pub fn can_retry( &self ) -> bool
  {
    self.attempts < self.max_attempts
  }

  /// Reset a `Failed` task back to `Pending` for a retry.
  ///
  /// # Panics
  ///
  /// Panics if called when [`Self::can_retry`] does not hold or the task is
  /// not currently `Failed` — this is a programming error at the call site,
  /// not a runtime condition callers should handle.
  pub fn reset_for_retry( &mut self )
  {
    assert!( self.can_retry(), "reset_for_retry called with no retry budget remaining" );
    assert_eq!( self.status, TaskStatus::Failed, "reset_for_retry called on a non-Failed task" );
    self.status = TaskStatus::Pending;
    self.worker_id = None;
    self.started_at = None;
  }

  /// Mark the task `Processing`, leased by `worker_id`, bumping the attempt counter.
  pub fn lease( &mut self, worker_id : String )
  {
    self.status = TaskStatus::Processing;
    self.worker_id = Some( worker_id );
    self.attempts += 1;
    self.started_at = Some( now_secs() );
  }

  /// Mark the task `Success`.
  pub fn mark_success( &mut self, duration_secs : f64, credential_id : String )
  {
    self.status = TaskStatus::Success;
    self.completed_at = Some( now_secs() );
    self.processing_duration_secs = Some( duration_secs );
    self.credential_id = Some( credential_id );
  }

  /// Mark the task `Failed` with the given error message.
  pub fn mark_failed( &mut self, error : String )
  {
    self.status = TaskStatus::Failed;
    self.completed_at = Some( now_secs() );
    self.last_error = Some( error );
  }

  /// Mark the task `Skipped`.
  pub fn mark_skipped( &mut self )
  {
    self.status = TaskStatus::Skipped;
    self.completed_at = Some( now_secs() );
  }

  /// Mark the task `Cancelled`.
  pub fn mark_cancelled( &mut self )
  {
    self.status = TaskStatus::Cancelled;
    self.completed_at = Some( now_secs() );
  }
}

/// Lifecycle status of a [`Batch`].
#[ derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default ) ]
#[ serde( rename_all = "snake_case" ) ]
pub enum BatchStatus
{
  /// Just created; tasks may not have been dispatched yet.
  #[ default ]
  Created,
  /// Dispatch is in progress.
  Running,
  /// Cooperatively interrupted; resumable.
  Paused,
  /// All tasks terminal, none `Failed`.
  Completed,
  /// All tasks terminal, at least one `Failed`.
  Failed,
  /// Explicitly cancelled.
  Cancelled,
}

/// Shared execution configuration for a [`Batch`].
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
pub struct BatchConfig
{
  /// Directory that was scanned for input videos.
  pub input_dir : PathBuf,
  /// Prompt template name applied to every task.
  pub template : String,
  /// Directory lesson artifacts are written under.
  pub output_dir : PathBuf,
  /// Worker pool size.
  #[ serde( default = "default_worker_cap" ) ]
  pub worker_cap : usize,
  /// Per-class max-attempts is owned by the classifier; this is the
  /// task-level ceiling new tasks are created with.
  #[ serde( default = "default_max_attempts" ) ]
  pub max_retries : u32,
  /// Whether an existing non-empty output should cause a task to be skipped.
  #[ serde( default ) ]
  pub skip_existing : bool,
  /// Wall-clock seconds a single task's upload->poll->generate sequence may take.
  #[ serde( default = "default_per_task_timeout_secs" ) ]
  pub per_task_timeout_secs : u64,
}

fn default_worker_cap() -> usize
{
  2
}

fn default_per_task_timeout_secs() -> u64
{
  360
}

/// A named collection of [`Task`]s sharing one [`BatchConfig`].
#[ derive( Debug, Clone, Serialize, Deserialize ) ]
pub struct Batch
{
  /// Batch id (timestamp + random suffix).
  pub id : String,
  /// Shared configuration.
  pub config : BatchConfig,
  /// Current lifecycle status.
  #[ serde( default ) ]
  pub status : BatchStatus,
  /// Task id -> Task.
  #[ serde( default ) ]
  pub tasks : HashMap< String, Task >,
  /// Unix timestamp (seconds) this batch was created.
  #[ serde( default = "now_secs" ) ]
  pub created_at : u64,
}

/// Per-status task counts plus a progress percentage, computed on read.
#[ derive( Debug, Clone, Copy, Default, Serialize ) ]
pub struct BatchStats
{
  /// Total tasks in the batch.
  pub total : usize,
  /// Tasks not yet leased.
  pub pending : usize,
  /// Tasks currently leased.
  pub processing : usize,
  /// Tasks that completed successfully.
  pub success : usize,
  /// Tasks that failed terminally.
  pub failed : usize,
  /// Tasks skipped because their output already existed.
  pub skipped : usize,
  /// Tasks cancelled by shutdown.
  pub cancelled : usize,
}

impl BatchStats
{
  /// Progress percentage in `[0, 100]`, based on the fraction of terminal tasks.
  #[ must_use ]
  pub fn progress_percent( self ) -> f64
  {
    if self.total == 0
    {
      100.0
    }
    else
    {
      let terminal = self.success + self.failed + self.skipped + self.cancelled;
      ( terminal as f64 / self.total as f64 ) * 100.0
    }
  }
}

impl Batch
{
  /// Construct a new, empty batch in the `Created` status.
  #[ must_use ]
  pub fn new( id : String, config : BatchConfig ) -> Self
  {
    Self { id, config, status : BatchStatus::Created, tasks : HashMap::new(), created_at : now_secs() }
  }

  /// Compute per-status counts. O(number of tasks).
  #[ must_use ]
  pub fn stats( &self ) -> BatchStats
  {
    let mut stats = BatchStats { total : self.tasks.len(), ..BatchStats::default() };
    for task in self.tasks.values()
    {
      match task.status
      {
        TaskStatus::Pending => stats.pending += 1,
        TaskStatus::Processing => stats.processing += 1,
        TaskStatus::Success => stats.success += 1,
        TaskStatus::Failed => stats.failed += 1,
        TaskStatus::Skipped => stats.skipped += 1,
        TaskStatus::Cancelled => stats.cancelled += 1,
      }
    }
    stats
  }

  /// Recompute [`BatchStatus`] from the current task statuses.
  ///
  /// A batch with zero tasks is `Completed` (the "Empty" boundary case has
  /// no dedicated status value). A batch with any non-terminal task stays
  /// `Running`; a fully-terminal batch is `Completed` unless at least one
  /// task is `Failed`, in which case it is `Failed`.
  pub fn recompute_status( &mut self )
  {
    if self.status == BatchStatus::Cancelled
    {
      return;
    }
    let stats = self.stats();
    if stats.total == 0
    {
      self.status = BatchStatus::Completed;
      return;
    }
    let terminal = stats.success + stats.failed + stats.skipped + stats.cancelled;
    if terminal < stats.total
    {
      if self.status != BatchStatus::Paused
      {
        self.status = BatchStatus::Running;
      }
      return;
    }
    self.status = if stats.failed > 0 { BatchStatus::Failed } else { BatchStatus::Completed };
  }
}

/// Current Unix time in seconds, `0` if the clock is somehow before the epoch.
#[ must_use ]
pub fn now_secs() -> u64
{
  SystemTime::now().duration_since( UNIX_EPOCH ).map( | d | d.as_secs() ).unwrap_or( 0 )
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  fn sample_config() -> BatchConfig
  {
    BatchConfig
    {
      input_dir : PathBuf::from( "in" ),
      template : "chinese_transcript".to_string(),
      output_dir : PathBuf::from( "out" ),
      worker_cap : 2,
      max_retries : 3,
      skip_existing : false,
      per_task_timeout_secs : 360,
    }
  }

  #[ test ]
  fn empty_batch_is_completed()
  {
    let mut batch = Batch::new( "b1".to_string(), sample_config() );
    batch.recompute_status();
    assert_eq!( batch.status, BatchStatus::Completed );
    assert_eq!( batch.stats().total, 0 );
  }

  #[ test ]
  fn progress_invariant_sums_to_total()
  {
    let mut batch = Batch::new( "b1".to_string(), sample_config() );
    for i in 0..5
    {
      let task = Task::new( format!( "t{i}" ), PathBuf::from( format!( "v{i}.mp4" ) ), "tmpl".to_string(), PathBuf::from( "o.md" ), "hash".to_string(), 3 );
      batch.tasks.insert( task.id.clone(), task );
    }
    let stats = batch.stats();
    assert_eq!( stats.pending + stats.processing + stats.success + stats.failed + stats.skipped + stats.cancelled, stats.total );
  }

  #[ test ]
  fn reset_for_retry_requires_failed_status_and_budget()
  {
    let mut task = Task::new( "t1".to_string(), PathBuf::from( "v.mp4" ), "tmpl".to_string(), PathBuf::from( "o.md" ), "hash".to_string(), 3 );
    task.lease( "w1".to_string() );
    task.mark_failed( "boom".to_string() );
    assert!( task.can_retry() );
    task.reset_for_retry();
    assert_eq!( task.status, TaskStatus::Pending );
  }

  #[ test ]
  fn attempts_never_exceed_max()
  {
    let mut task = Task::new( "t1".to_string(), PathBuf::from( "v.mp4" ), "tmpl".to_string(), PathBuf::from( "o.md" ), "hash".to_string(), 2 );
    task.lease( "w1".to_string() );
    task.mark_failed( "x".to_string() );
    task.reset_for_retry();
    task.lease( "w1".to_string() );
    assert_eq!( task.attempts, 2 );
    assert!( !task.can_retry() );
  }
}
