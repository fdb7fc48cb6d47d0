use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{channel, Sender},
    Mutex, PoisonError,
  },
  thread,
};

use super::{run_task, Scheduler, Task};
use crate::error::RxError;

/// Serializes every unit on one background thread, in submission order.
///
/// The thread is spawned on the first `schedule` call and reused for the
/// lifetime of the scheduler. `dispose` closes the queue: units already
/// queued still run, then the thread exits on its own.
#[derive(Debug)]
pub struct ThreadScheduler {
  name: String,
  sender: Mutex<Option<Sender<Task>>>,
  disposed: AtomicBool,
}

impl Default for ThreadScheduler {
  fn default() -> Self { Self::with_name("rxseq-thread") }
}

impl ThreadScheduler {
  pub fn new() -> Self { Self::default() }

  /// Creates a scheduler whose thread carries the given name.
  pub fn with_name(name: impl Into<String>) -> Self {
    ThreadScheduler { name: name.into(), sender: Mutex::new(None), disposed: AtomicBool::new(false) }
  }

  fn spawn_worker(&self) -> Result<Sender<Task>, RxError> {
    let (sender, receiver) = channel::<Task>();
    let name = self.name.clone();
    thread::Builder::new().name(self.name.clone()).spawn(move || {
      log::trace!("thread '{name}' starting");
      while let Ok(task) = receiver.recv() {
        run_task("thread", task);
      }
      log::trace!("thread '{name}' exiting");
    })?;
    Ok(sender)
  }
}

impl Scheduler for ThreadScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    let mut sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
    if self.is_disposed() {
      return Err(RxError::SchedulerShutdown { scheduler: self.name() });
    }
    if sender.is_none() {
      *sender = Some(self.spawn_worker()?);
    }
    match sender.as_ref().map(|s| s.send(task)) {
      Some(Ok(())) => Ok(()),
      _ => Err(RxError::SchedulerShutdown { scheduler: self.name() }),
    }
  }

  fn dispose(&self) {
    let mut sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
    if !self.disposed.swap(true, Ordering::AcqRel) {
      log::debug!("thread scheduler '{}' disposed", self.name);
    }
    sender.take();
  }

  fn is_disposed(&self) -> bool { self.disposed.load(Ordering::Acquire) }

  fn name(&self) -> &'static str { "thread" }
}
