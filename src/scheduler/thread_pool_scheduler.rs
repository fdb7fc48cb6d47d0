use std::sync::{Mutex, PoisonError};

use futures::{executor::ThreadPool, future};

use super::{run_task, Scheduler, Task};
use crate::error::RxError;

enum PoolState {
  Idle,
  Running(ThreadPool),
  Disposed,
}

/// A bounded worker pool backed by `futures::executor::ThreadPool`.
///
/// Units may run concurrently and out of submission order. The pool threads
/// are created on first use. After `dispose` new units are logged and
/// dropped; units already queued still run before the workers exit.
pub struct ThreadPoolScheduler {
  size: usize,
  name_prefix: String,
  state: Mutex<PoolState>,
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self { Self::new(0) }
}

impl ThreadPoolScheduler {
  /// `size == 0` sizes the pool to the number of CPUs.
  pub fn new(size: usize) -> Self { Self::with_name_prefix(size, "rxseq-pool-") }

  pub fn with_name_prefix(size: usize, name_prefix: impl Into<String>) -> Self {
    let size = if size == 0 { num_cpus::get() } else { size };
    ThreadPoolScheduler { size: size.max(1), name_prefix: name_prefix.into(), state: Mutex::new(PoolState::Idle) }
  }

  /// Number of worker threads.
  pub fn parallelism(&self) -> usize { self.size }

  /// Like [`Scheduler::schedule`], but reports a disposed pool as an error
  /// so the caller can run the unit itself instead of losing it.
  pub(crate) fn try_spawn(&self, task: Task) -> Result<(), RxError> {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    if let PoolState::Idle = *state {
      let pool = ThreadPool::builder()
        .pool_size(self.size)
        .name_prefix(self.name_prefix.clone())
        .after_start(|idx| log::trace!("pool worker {idx} starting"))
        .before_stop(|idx| log::trace!("pool worker {idx} exiting"))
        .create()?;
      *state = PoolState::Running(pool);
    }
    match &*state {
      PoolState::Running(pool) => {
        pool.spawn_ok(future::lazy(move |_| run_task("thread-pool", task)));
        Ok(())
      }
      _ => Err(RxError::SchedulerShutdown { scheduler: self.name() }),
    }
  }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    match self.try_spawn(task) {
      Err(RxError::SchedulerShutdown { .. }) => {
        log::warn!("thread pool already shut down, dropping background task");
        Ok(())
      }
      other => other,
    }
  }

  fn try_schedule(&self, task: Task) -> Result<(), RxError> { self.try_spawn(task) }

  fn dispose(&self) {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    if !matches!(*state, PoolState::Disposed) {
      log::debug!("thread pool scheduler disposed");
    }
    *state = PoolState::Disposed;
  }

  fn is_disposed(&self) -> bool {
    matches!(*self.state.lock().unwrap_or_else(PoisonError::into_inner), PoolState::Disposed)
  }

  fn name(&self) -> &'static str { "thread-pool" }
}

impl std::fmt::Debug for ThreadPoolScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ThreadPoolScheduler")
      .field("size", &self.size)
      .field("disposed", &self.is_disposed())
      .finish()
  }
}
