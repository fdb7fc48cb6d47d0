use std::sync::atomic::{AtomicBool, Ordering};

use super::{run_task, Scheduler, Task};
use crate::error::RxError;

/// Runs units synchronously on the calling thread.
///
/// Every unit runs to its end before `schedule` returns, including units
/// submitted from inside another unit. Sequential delivery does not resubmit
/// per element on this backend (see [`Scheduler::is_inline`]), so stack depth
/// stays constant however long the sequence is. An infinite sequence never
/// hands control back to the caller.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
  disposed: AtomicBool,
}

impl ImmediateScheduler {
  pub fn new() -> Self { Self::default() }
}

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    if self.is_disposed() {
      return Err(RxError::SchedulerShutdown { scheduler: self.name() });
    }
    run_task(self.name(), task);
    Ok(())
  }

  fn dispose(&self) {
    if !self.disposed.swap(true, Ordering::AcqRel) {
      log::debug!("immediate scheduler disposed");
    }
  }

  fn is_disposed(&self) -> bool { self.disposed.load(Ordering::Acquire) }

  fn is_inline(&self) -> bool { true }

  fn name(&self) -> &'static str { "immediate" }
}
