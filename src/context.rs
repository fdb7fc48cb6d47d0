//! Execution context threaded through observable construction.
//!
//! There is no process-wide default scheduler. A [`Context`] is created once
//! by the application, handed to every factory (see
//! [`ObservableFactory`](crate::factory::ObservableFactory)), and disposed
//! explicitly when the application shuts down. Cloning a context is cheap and
//! shares its worker pool.
//!
//! # Example
//! ```
//! use rxseq::prelude::*;
//!
//! let mut cfg = Config::default();
//! cfg.pool_size = 2;
//! cfg.batch_factor = 4;
//!
//! let ctx = Context::new(cfg);
//! assert_eq!(ctx.worker_pool().parallelism(), 2);
//! ctx.dispose();
//! ```

use std::{
  fmt::{Debug, Formatter},
  sync::Arc,
};

use crate::scheduler::{
  Duration, ImmediateScheduler, Scheduler, SharedScheduler, ThreadPoolScheduler, ThreadScheduler,
  TimerScheduler,
};

/// Tunables for a [`Context`].
#[derive(Clone, Debug)]
pub struct Config {
  /// Worker threads in the shared pool (0 = number of CPUs).
  pub pool_size: usize,
  /// Parallel delivery aims for `pool_size * batch_factor` batches.
  pub batch_factor: usize,
  /// Prefix for worker thread names.
  pub thread_name_prefix: String,
  /// Interval used by [`Context::timer_scheduler`].
  pub timer_interval: Duration,
}

impl Default for Config {
  /// Provides a default configuration:
  /// - `pool_size = 0` (number of CPUs)
  /// - `batch_factor = 8`
  /// - `thread_name_prefix = "rxseq"`
  /// - `timer_interval = 10ms`
  fn default() -> Self {
    Self {
      pool_size: 0,
      batch_factor: 8,
      thread_name_prefix: "rxseq".to_string(),
      timer_interval: Duration::from_millis(10),
    }
  }
}

/// The execution environment every observable carries: the scheduler used
/// for sequential delivery (the worker pool unless overridden) and the pool
/// that runs parallel delivery.
#[derive(Clone)]
pub struct Context {
  scheduler: SharedScheduler,
  pool: Arc<ThreadPoolScheduler>,
  batch_factor: usize,
  thread_name_prefix: Arc<str>,
  timer_interval: Duration,
}

impl Default for Context {
  fn default() -> Self { Self::new(Config::default()) }
}

impl Context {
  pub fn new(config: Config) -> Self {
    let Config { pool_size, batch_factor, thread_name_prefix, timer_interval } = config;
    let pool = Arc::new(ThreadPoolScheduler::with_name_prefix(
      pool_size,
      format!("{thread_name_prefix}-pool-"),
    ));
    Context {
      scheduler: pool.clone(),
      pool,
      batch_factor: batch_factor.max(1),
      thread_name_prefix: thread_name_prefix.into(),
      timer_interval,
    }
  }

  /// Scheduler used for sequential delivery.
  pub fn scheduler(&self) -> &SharedScheduler { &self.scheduler }

  /// Pool used for parallel delivery.
  pub fn worker_pool(&self) -> &Arc<ThreadPoolScheduler> { &self.pool }

  pub fn batch_factor(&self) -> usize { self.batch_factor }

  /// Returns a context sharing this one's pool but delivering sequential
  /// observables through `scheduler`.
  pub fn with_scheduler(&self, scheduler: SharedScheduler) -> Self {
    Context { scheduler, ..self.clone() }
  }

  /// A fresh inline scheduler.
  pub fn immediate_scheduler(&self) -> SharedScheduler { Arc::new(ImmediateScheduler::new()) }

  /// A fresh dedicated-thread scheduler named after this context.
  pub fn thread_scheduler(&self) -> SharedScheduler {
    Arc::new(ThreadScheduler::with_name(format!("{}-thread", self.thread_name_prefix)))
  }

  /// A fresh timer scheduler using the configured interval.
  pub fn timer_scheduler(&self) -> SharedScheduler { Arc::new(TimerScheduler::new(self.timer_interval)) }

  /// Disposes the default scheduler and the worker pool. Outstanding
  /// sequential deliveries on them end with a scheduler-shutdown error when
  /// they try to submit their next element.
  pub fn dispose(&self) {
    self.scheduler.dispose();
    self.pool.dispose();
  }
}

impl Debug for Context {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Context")
      .field("scheduler", &self.scheduler.name())
      .field("pool", &self.pool)
      .field("batch_factor", &self.batch_factor)
      .finish()
  }
}
