//! Sequential delivery: one element per scheduled unit, or one loop per
//! delivery on the inline backend.

use super::pull;
use crate::{
  error::RxError,
  scheduler::{SharedScheduler, Task},
  source::BoxedSource,
  subscriber::Subscriber,
};

/// Owns everything one sequential delivery needs. Each tick moves the loop
/// into the next scheduled unit, so no state is shared between units.
pub(crate) struct TickLoop<T> {
  source: BoxedSource<T>,
  error: Option<RxError>,
  scheduler: SharedScheduler,
  subscriber: Subscriber<T>,
}

impl<T: Send + 'static> TickLoop<T> {
  pub(crate) fn new(
    source: BoxedSource<T>,
    error: Option<RxError>,
    scheduler: SharedScheduler,
    subscriber: Subscriber<T>,
  ) -> Self {
    TickLoop { source, error, scheduler, subscriber }
  }

  /// Submits the next tick. A scheduler that refuses the unit ends the
  /// delivery with its error. On an inline scheduler the whole delivery runs
  /// in one unit.
  pub(crate) fn start(self) {
    let scheduler = self.scheduler.clone();
    let subscriber = self.subscriber.clone();
    let unit: Task = if scheduler.is_inline() {
      Box::new(move || self.run_inline())
    } else {
      Box::new(move || self.tick())
    };
    if let Err(err) = scheduler.try_schedule(unit) {
      subscriber.notify_error(err);
    }
  }

  fn tick(mut self) {
    if self.step() {
      self.start();
    }
  }

  /// Loops in place instead of resubmitting, so a nested inline delivery
  /// started from a consumer callback finishes before its `subscribe`
  /// returns.
  fn run_inline(mut self) {
    while self.step() {
      if self.scheduler.is_disposed() {
        let scheduler = self.scheduler.name();
        self.subscriber.notify_error(RxError::SchedulerShutdown { scheduler });
        return;
      }
    }
  }

  /// Delivers at most one element. Returns whether delivery goes on.
  fn step(&mut self) -> bool {
    if !self.subscriber.is_active() {
      return false;
    }
    if let Some(err) = self.error.take() {
      self.subscriber.notify_error(err);
      return false;
    }
    match pull(&mut self.source) {
      Ok(Some(v)) => self.subscriber.notify_next(v),
      Ok(None) => {
        self.subscriber.notify_completed();
        false
      }
      Err(err) => {
        self.subscriber.notify_error(err);
        false
      }
    }
  }
}
