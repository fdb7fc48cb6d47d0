//! Pluggable execution strategies for units of delivery work.
//!
//! | Backend | Execution | After `dispose` |
//! |---------|-----------|-----------------|
//! | [`ImmediateScheduler`] | synchronously on the calling thread | `Err(SchedulerShutdown)` |
//! | [`ThreadScheduler`] | one dedicated thread, submission order | `Err(SchedulerShutdown)` |
//! | [`ThreadPoolScheduler`] | bounded worker pool, any order | warning, unit dropped |
//! | [`TimerScheduler`] | timer thread, fixed delay after submission | `Err(SchedulerShutdown)` |
//!
//! The asynchronous pool only logs because it is also driven from worker
//! threads that have nobody to return an error to. Its
//! [`Scheduler::try_schedule`] reports the refusal, and that is what delivery
//! loops use.

use std::{
  panic::{catch_unwind, AssertUnwindSafe},
  sync::Arc,
};

use crate::error::{panic_message, RxError};

mod immediate;
mod thread_pool_scheduler;
mod thread_scheduler;
mod timer_scheduler;

pub use immediate::ImmediateScheduler;
pub use std::time::{Duration, Instant};
pub use thread_pool_scheduler::ThreadPoolScheduler;
pub use thread_scheduler::ThreadScheduler;
pub use timer_scheduler::TimerScheduler;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A scheduler shared between observables and delivery loops.
pub type SharedScheduler = Arc<dyn Scheduler>;

/// A Scheduler is an object to order tasks and schedule their execution.
pub trait Scheduler: Send + Sync {
  /// Submits a unit of work. Returns immediately (except for the inline
  /// backend, which runs it before returning).
  fn schedule(&self, task: Task) -> Result<(), RxError>;

  /// Like [`Scheduler::schedule`], but a backend that drops units after
  /// dispose reports the refusal as an error instead. Delivery loops submit
  /// through this so a shut-down backend ends the delivery visibly.
  fn try_schedule(&self, task: Task) -> Result<(), RxError> { self.schedule(task) }

  /// Stops accepting new work and releases threads. Safe to call repeatedly.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;

  /// Whether `schedule` runs the unit on the calling thread before returning.
  fn is_inline(&self) -> bool { false }

  /// Short backend name used in logs and errors.
  fn name(&self) -> &'static str;
}

/// Handle-passing form of [`Scheduler::schedule`].
pub trait SchedulerExt: Scheduler {
  /// Runs `unit(handle)` on this scheduler.
  fn schedule_background_task<H, F>(&self, unit: F, handle: H) -> Result<(), RxError>
  where
    H: Send + 'static,
    F: FnOnce(H) + Send + 'static,
  {
    self.schedule(Box::new(move || unit(handle)))
  }
}

impl<S: Scheduler + ?Sized> SchedulerExt for S {}

/// Returns a scheduler that runs every unit on the calling thread.
pub fn immediate() -> SharedScheduler { Arc::new(ImmediateScheduler::new()) }

/// Returns a scheduler with one dedicated background thread.
pub fn new_thread() -> SharedScheduler { Arc::new(ThreadScheduler::new()) }

/// Returns a worker pool with `size` threads (`0` = number of CPUs).
pub fn thread_pool(size: usize) -> SharedScheduler { Arc::new(ThreadPoolScheduler::new(size)) }

/// Returns a scheduler that runs each unit `interval` after its submission.
pub fn timer(interval: Duration) -> SharedScheduler { Arc::new(TimerScheduler::new(interval)) }

/// Runs a unit on a backend thread; a panic is logged instead of killing the
/// thread.
pub(crate) fn run_task(backend: &'static str, task: Task) {
  if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
    log::error!("{backend} scheduler task panicked: {}", panic_message(payload.as_ref()));
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::mpsc::channel;

  #[test]
  fn handle_is_passed_back() {
    let (tx, rx) = channel();
    for scheduler in [immediate(), new_thread(), thread_pool(2), timer(Duration::from_millis(1))] {
      let tx = tx.clone();
      scheduler
        .schedule_background_task(move |v: &'static str| tx.send(v).unwrap(), scheduler.name())
        .unwrap();
      assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), scheduler.name());
      scheduler.dispose();
      scheduler.dispose();
      assert!(scheduler.is_disposed());
    }
  }

  #[test]
  fn panicking_unit_does_not_kill_backend() {
    for scheduler in [immediate(), new_thread(), thread_pool(1), timer(Duration::from_millis(1))] {
      scheduler.schedule(Box::new(|| panic!("unit failed"))).unwrap();
      let (tx, rx) = channel();
      scheduler.schedule(Box::new(move || tx.send(()).unwrap())).unwrap();
      assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok(), "{}", scheduler.name());
      scheduler.dispose();
    }
  }
}
