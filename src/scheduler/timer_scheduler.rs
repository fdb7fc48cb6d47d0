use std::{
  cmp::Ordering,
  collections::BinaryHeap,
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
  thread,
};

use super::{run_task, Duration, Instant, Scheduler, Task};
use crate::error::RxError;

struct TimedTask {
  deadline: Instant,
  task_id: u64,
  task: Task,
}

impl PartialEq for TimedTask {
  fn eq(&self, other: &Self) -> bool { self.deadline == other.deadline && self.task_id == other.task_id }
}

impl Eq for TimedTask {}

impl PartialOrd for TimedTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for TimedTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier deadlines first, then FIFO by task_id
    other
      .deadline
      .cmp(&self.deadline)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

#[derive(Default)]
struct TimerState {
  queue: BinaryHeap<TimedTask>,
  next_task_id: u64,
  started: bool,
  disposed: bool,
}

#[derive(Default)]
struct Shared {
  state: Mutex<TimerState>,
  wakeup: Condvar,
}

impl Shared {
  fn lock(&self) -> MutexGuard<'_, TimerState> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }
}

/// Runs each unit once, a fixed `interval` after it was submitted.
///
/// One timer thread per instance, started on first use. Used to pace
/// delivery: the tick loop resubmits itself after every element, so a
/// sequence is emitted one element per `interval`. `dispose` drops every
/// pending unit and stops the thread.
pub struct TimerScheduler {
  interval: Duration,
  shared: Arc<Shared>,
}

impl TimerScheduler {
  pub fn new(interval: Duration) -> Self { TimerScheduler { interval, shared: Arc::default() } }

  pub fn interval(&self) -> Duration { self.interval }

  /// Number of units waiting for their deadline.
  pub fn pending_count(&self) -> usize { self.shared.lock().queue.len() }

  fn spawn_timer(&self) -> Result<(), RxError> {
    let shared = self.shared.clone();
    thread::Builder::new()
      .name("rxseq-timer".into())
      .spawn(move || timer_loop(&shared))?;
    Ok(())
  }
}

fn timer_loop(shared: &Shared) {
  log::trace!("timer thread starting");
  let mut state = shared.lock();
  loop {
    if state.disposed {
      break;
    }
    let now = Instant::now();
    let next_deadline = state.queue.peek().map(|t| t.deadline);
    state = match next_deadline {
      Some(deadline) if deadline <= now => {
        let due = state.queue.pop();
        drop(state);
        if let Some(due) = due {
          run_task("timer", due.task);
        }
        shared.lock()
      }
      None => shared.wakeup.wait(state).unwrap_or_else(PoisonError::into_inner),
      Some(deadline) => {
        let timeout = deadline - now;
        shared
          .wakeup
          .wait_timeout(state, timeout)
          .unwrap_or_else(PoisonError::into_inner)
          .0
      }
    };
  }
  log::trace!("timer thread exiting");
}

impl Scheduler for TimerScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    let mut state = self.shared.lock();
    if state.disposed {
      return Err(RxError::SchedulerShutdown { scheduler: self.name() });
    }
    let deadline = Instant::now()
      .checked_add(self.interval)
      .ok_or(RxError::IntervalOverflow { interval: self.interval })?;
    if !state.started {
      self.spawn_timer()?;
      state.started = true;
    }
    let task_id = state.next_task_id;
    state.next_task_id += 1;
    state.queue.push(TimedTask { deadline, task_id, task });
    drop(state);
    self.shared.wakeup.notify_one();
    Ok(())
  }

  fn dispose(&self) {
    let dropped = {
      let mut state = self.shared.lock();
      if state.disposed {
        return;
      }
      state.disposed = true;
      std::mem::take(&mut state.queue)
    };
    log::debug!("timer scheduler disposed, {} pending task(s) dropped", dropped.len());
    self.shared.wakeup.notify_all();
  }

  fn is_disposed(&self) -> bool { self.shared.lock().disposed }

  fn name(&self) -> &'static str { "timer" }
}

impl Drop for TimerScheduler {
  fn drop(&mut self) { self.dispose() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::mpsc::channel;

  #[test]
  fn runs_after_interval() {
    let scheduler = TimerScheduler::new(Duration::from_millis(20));
    let stamp = Instant::now();
    let (tx, rx) = channel();
    scheduler.schedule(Box::new(move || tx.send(Instant::now()).unwrap())).unwrap();
    let fired = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(fired - stamp >= Duration::from_millis(20));
  }

  #[test]
  fn same_deadline_runs_fifo() {
    let scheduler = TimerScheduler::new(Duration::from_millis(5));
    let (tx, rx) = channel();
    for i in 0..20 {
      let tx = tx.clone();
      scheduler.schedule(Box::new(move || tx.send(i).unwrap())).unwrap();
    }
    let got: Vec<i32> = (0..20)
      .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
      .collect();
    assert_eq!(got, (0..20).collect::<Vec<_>>());
  }

  #[test]
  fn dispose_drops_pending_and_refuses_new_work() {
    let scheduler = TimerScheduler::new(Duration::from_millis(200));
    let (tx, rx) = channel::<()>();
    scheduler.schedule(Box::new(move || tx.send(()).unwrap())).unwrap();
    assert_eq!(scheduler.pending_count(), 1);
    scheduler.dispose();
    assert_eq!(scheduler.pending_count(), 0);
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    let err = scheduler.schedule(Box::new(|| {})).unwrap_err();
    assert!(matches!(err, RxError::SchedulerShutdown { scheduler: "timer" }));
  }

  #[test]
  fn unrepresentable_deadline_is_refused() {
    let scheduler = TimerScheduler::new(Duration::MAX);
    let err = scheduler.schedule(Box::new(|| {})).unwrap_err();
    assert_eq!(err.as_label(), "interval_overflow");
    assert_eq!(scheduler.pending_count(), 0);
    assert!(!scheduler.is_disposed());
  }
}
