//! Parallel delivery over a splittable source.
//!
//! The source is split recursively until every part is no larger than the
//! target batch size; each split-off part runs as its own unit on the worker
//! pool. Elements arrive in no particular order. A pending counter tracks
//! unfinished branches and the branch that brings it to zero completes the
//! subscriber.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex, PoisonError,
};

use super::pull;
use crate::{
  scheduler::ThreadPoolScheduler,
  source::{BoxedSource, CancelableSource, SizeHint, Source},
  subscriber::Subscriber,
  subscription::CancelFlag,
};

struct ParShared<T> {
  subscriber: Subscriber<T>,
  pool: Arc<ThreadPoolScheduler>,
  target: usize,
  pending: AtomicUsize,
}

/// Target elements per batch so the pool sees roughly
/// `parallelism * batch_factor` batches.
pub(crate) fn batch_size(estimated: SizeHint, parallelism: usize, batch_factor: usize) -> usize {
  let size = estimated.bounded().unwrap_or(usize::MAX);
  (size / (parallelism.max(1) * batch_factor.max(1))).max(1)
}

pub(crate) fn start<T: Send + 'static>(
  source: BoxedSource<T>,
  subscriber: Subscriber<T>,
  pool: Arc<ThreadPoolScheduler>,
  batch_factor: usize,
) {
  let flag = CancelFlag::new();
  subscriber.add(flag.clone());
  let source = CancelableSource::new(source, flag);
  let target = batch_size(source.size_hint(), pool.parallelism(), batch_factor);
  log::trace!("parallel delivery of {:?} elements in batches of {target}", source.size_hint());
  let shared = Arc::new(ParShared { subscriber, pool, target, pending: AtomicUsize::new(1) });
  spawn_branch(&shared, source);
}

fn spawn_branch<T: Send + 'static>(shared: &Arc<ParShared<T>>, part: CancelableSource<T>) {
  let slot = Arc::new(Mutex::new(Some(part)));
  let c_slot = slot.clone();
  let c_shared = shared.clone();
  let spawned = shared.pool.try_spawn(Box::new(move || {
    if let Some(part) = take(&c_slot) {
      run_branch(c_shared, part);
    }
  }));
  if let Err(err) = spawned {
    log::debug!("worker pool refused a batch ({}), draining it inline", err.as_label());
    if let Some(part) = take(&slot) {
      run_branch(shared.clone(), part);
    }
  }
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
  slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

fn run_branch<T: Send + 'static>(shared: Arc<ParShared<T>>, mut source: CancelableSource<T>) {
  while shared.subscriber.is_active() && source.size_hint() > SizeHint::Bounded(shared.target) {
    let Some(part) = source.split() else { break };
    shared.pending.fetch_add(1, Ordering::AcqRel);
    spawn_branch(&shared, part);
  }
  drain_branch(&shared.subscriber, &mut source);
  if shared.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
    shared.subscriber.notify_completed();
  }
}

fn drain_branch<T: Send + 'static>(subscriber: &Subscriber<T>, source: &mut CancelableSource<T>) {
  while subscriber.is_active() {
    match pull(source) {
      Ok(Some(v)) => {
        if !subscriber.notify_next(v) {
          return;
        }
      }
      Ok(None) => return,
      Err(err) => {
        subscriber.notify_error(err);
        return;
      }
    }
  }
}
