//! Integration tests for rxseq
//!
//! Exercises the delivery guarantees across all scheduler backends, plus
//! disposal, failure routing and parallel delivery.

use std::{
  collections::HashSet,
  sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc::{channel, Receiver},
    Arc, Mutex,
  },
  thread,
  time::Duration,
};

use rxseq::{prelude::*, scheduler};

#[derive(Debug, Clone, PartialEq)]
enum Event<T> {
  Next(T),
  Error(String),
  Completed,
}

/// Subscribes and records every notification; the receiver fires once per
/// terminal notification.
fn record<T, O>(observable: O) -> (Arc<Mutex<Vec<Event<T>>>>, Receiver<()>, Subscription)
where
  T: Send + 'static,
  O: Subscribe<T>,
{
  let events = Arc::new(Mutex::new(Vec::new()));
  let (done_tx, done_rx) = channel();
  let err_tx = done_tx.clone();
  let (c_next, c_err, c_done) = (events.clone(), events.clone(), events.clone());
  let subscription = observable.subscribe_all(
    move |v| c_next.lock().unwrap().push(Event::Next(v)),
    move |e| {
      c_err.lock().unwrap().push(Event::Error(e.to_string()));
      let _ = err_tx.send(());
    },
    move || {
      c_done.lock().unwrap().push(Event::Completed);
      let _ = done_tx.send(());
    },
  );
  (events, done_rx, subscription)
}

fn wait(done: &Receiver<()>) { done.recv_timeout(Duration::from_secs(10)).unwrap(); }

fn backends(ctx: &Context) -> Vec<(&'static str, SharedScheduler)> {
  vec![
    ("immediate", ctx.immediate_scheduler()),
    ("thread", ctx.thread_scheduler()),
    ("pool", ctx.scheduler().clone()),
    ("timer", scheduler::timer(Duration::from_millis(1))),
  ]
}

#[test]
fn finite_source_on_every_backend() {
  let ctx = Context::default();
  for (name, scheduler) in backends(&ctx) {
    let (events, done, _) = record(ctx.range(0, 20).subscribe_on(scheduler.clone()));
    wait(&done);
    let mut expected: Vec<_> = (0..20).map(Event::Next).collect();
    expected.push(Event::Completed);
    assert_eq!(*events.lock().unwrap(), expected, "backend {name}");
    scheduler.dispose();
  }
  ctx.dispose();
}

#[test]
fn failing_source_on_every_backend() {
  let ctx = Context::default();
  for (name, scheduler) in backends(&ctx) {
    let items = vec![Ok(1), Ok(2), Ok(3), Err(RxError::msg("fourth failed")), Ok(5)];
    let (events, done, _) = record(ctx.from_results(items).subscribe_on(scheduler.clone()));
    wait(&done);
    // give a wrongly scheduled extra notification a chance to show up
    thread::sleep(Duration::from_millis(20));
    assert_eq!(
      *events.lock().unwrap(),
      vec![
        Event::Next(1),
        Event::Next(2),
        Event::Next(3),
        Event::Error("fourth failed".to_string())
      ],
      "backend {name}"
    );
    scheduler.dispose();
  }
  ctx.dispose();
}

#[test]
fn dispose_stops_infinite_source() {
  let ctx = Context::default();
  for scheduler in [ctx.thread_scheduler(), ctx.scheduler().clone()] {
    let delivered = Arc::new(AtomicUsize::new(0));
    let c_delivered = delivered.clone();
    let subscription = ctx.integers(0).subscribe_on(scheduler.clone()).subscribe(move |_| {
      c_delivered.fetch_add(1, Ordering::SeqCst);
    });
    while delivered.load(Ordering::SeqCst) < 100 {
      thread::yield_now();
    }
    subscription.dispose();
    thread::sleep(Duration::from_millis(20));
    let after_dispose = delivered.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(delivered.load(Ordering::SeqCst), after_dispose);
    assert!(subscription.is_disposed());
    scheduler.dispose();
  }
  ctx.dispose();
}

#[test]
fn merge_concatenates() {
  let ctx = Context::default();
  let (events, done, _) = record(ctx.from_vec(vec![1, 2, 3]).merge(ctx.from_vec(vec![4, 5, 6])));
  wait(&done);
  let mut expected: Vec<_> = (1..=6).map(Event::Next).collect();
  expected.push(Event::Completed);
  assert_eq!(*events.lock().unwrap(), expected);
}

#[test]
fn zip_pairs_and_trailing_element() {
  let ctx = Context::default();
  let words = || ctx.from_vec(vec!["One", "Two", "Three"]);

  let (events, done, _) = record(words().zip(ctx.from_vec(vec![1, 2, 3])));
  wait(&done);
  assert_eq!(
    *events.lock().unwrap(),
    vec![
      Event::Next(ZipItem::Pair("One", 1)),
      Event::Next(ZipItem::Pair("Two", 2)),
      Event::Next(ZipItem::Pair("Three", 3)),
      Event::Completed
    ]
  );

  let (events, done, _) = record(words().zip(ctx.from_vec(vec![1, 2, 3, 4])));
  wait(&done);
  let events = events.lock().unwrap();
  assert_eq!(events.len(), 5);
  assert_eq!(events[3], Event::Next(ZipItem::Right(4)));
  assert_eq!(events[4], Event::Completed);
}

#[test]
fn consumer_panic_on_second_element() {
  let ctx = Context::default();
  let events = Arc::new(Mutex::new(Vec::new()));
  let (tx, rx) = channel();
  let (c_next, c_err, c_done) = (events.clone(), events.clone(), events.clone());
  ctx.from_vec(vec![1, 2, 3]).subscribe_all(
    move |v| {
      if v == 2 {
        panic!("cannot handle {v}");
      }
      c_next.lock().unwrap().push(Event::Next(v));
    },
    move |e| {
      c_err.lock().unwrap().push(Event::Error(e.as_label().to_string()));
      tx.send(()).unwrap();
    },
    move || c_done.lock().unwrap().push(Event::Completed),
  );
  rx.recv_timeout(Duration::from_secs(10)).unwrap();
  thread::sleep(Duration::from_millis(20));
  assert_eq!(
    *events.lock().unwrap(),
    vec![Event::Next(1), Event::Error("consumer_panic".to_string())]
  );
}

#[test]
fn parallel_range_delivers_everything() {
  let ctx = Context::new(Config { pool_size: 4, ..Config::default() });
  let (events, done, _) = record(ctx.range(0, 1000).map(|v| v * 2).parallel());
  wait(&done);
  let events = events.lock().unwrap();
  let values: HashSet<i64> = events
    .iter()
    .filter_map(|e| match e {
      Event::Next(v) => Some(*v),
      _ => None,
    })
    .collect();
  assert_eq!(values, (0..1000).map(|v| v * 2).collect::<HashSet<_>>());
  assert_eq!(events.len(), 1001);
  assert_eq!(events.iter().filter(|e| **e == Event::Completed).count(), 1);
  ctx.dispose();
}

#[test]
fn parallel_dispose_stops_early() {
  let ctx = Context::new(Config { pool_size: 2, ..Config::default() });
  let delivered = Arc::new(AtomicUsize::new(0));
  let terminal = Arc::new(AtomicUsize::new(0));
  let (tx, rx) = channel();
  let c_delivered = delivered.clone();
  let (c_err, c_done) = (terminal.clone(), terminal.clone());
  let subscription = ctx.range(0, 101).parallel().subscribe_all(
    move |_| {
      c_delivered.fetch_add(1, Ordering::SeqCst);
      let _ = tx.send(());
      thread::sleep(Duration::from_millis(5));
    },
    move |_| {
      c_err.fetch_add(1, Ordering::SeqCst);
    },
    move || {
      c_done.fetch_add(1, Ordering::SeqCst);
    },
  );
  rx.recv_timeout(Duration::from_secs(10)).unwrap();
  subscription.dispose();
  thread::sleep(Duration::from_millis(100));
  let count = delivered.load(Ordering::SeqCst);
  assert!(count > 0 && count < 101, "delivered {count}");
  assert_eq!(terminal.load(Ordering::SeqCst), 0);
  ctx.dispose();
}

#[test]
fn parallel_on_unsplittable_source_stays_ordered() {
  let ctx = Context::default();
  let (events, done, _) = record(ctx.integers(0).limit(50).parallel());
  wait(&done);
  let mut expected: Vec<_> = (0..50).map(Event::Next).collect();
  expected.push(Event::Completed);
  assert_eq!(*events.lock().unwrap(), expected);
}

#[test]
fn double_dispose_is_noop() {
  let ctx = Context::default();
  let subscription = ctx.never::<i32>().subscribe(|_| {});
  subscription.dispose();
  subscription.dispose();
  assert!(subscription.is_disposed());
  assert_eq!(subscription.status(), Status::Disposed);
}

#[test]
fn count_then_complete() {
  let ctx = Context::default();
  let (events, done, _) = record(ctx.from_vec(vec!['a', 'b', 'c', 'd', 'e']).count());
  wait(&done);
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(5), Event::Completed]);

  let (events, done, _) = record(ctx.empty::<char>().count());
  wait(&done);
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(0), Event::Completed]);
}

#[test]
fn create_with_panicking_producer() {
  let ctx = Context::default();
  let (events, done, subscription) = record(ctx.create(|emitter: &mut dyn Emitter<i32>| {
    emitter.next(7);
    panic!("producer failed");
  }));
  wait(&done);
  assert_eq!(
    *events.lock().unwrap(),
    vec![Event::Next(7), Event::Error("producer panicked: producer failed".to_string())]
  );
  assert!(subscription.is_terminated());
}

#[test]
fn shut_down_backends_refuse_work() {
  let refusing = [scheduler::immediate(), scheduler::new_thread(), scheduler::timer(Duration::from_millis(1))];
  for scheduler in refusing {
    scheduler.dispose();
    let err = scheduler.schedule(Box::new(|| {})).unwrap_err();
    assert!(matches!(err, RxError::SchedulerShutdown { .. }), "{}", scheduler.name());
  }
  let pool = ThreadPoolScheduler::new(1);
  pool.dispose();
  assert!(pool.schedule(Box::new(|| {})).is_ok());
}

#[test]
fn delivery_on_disposed_scheduler_fails() {
  let ctx = Context::default();
  let scheduler = ctx.immediate_scheduler();
  scheduler.dispose();
  let (events, done, _) = record(ctx.from_vec(vec![1]).subscribe_on(scheduler));
  wait(&done);
  assert_eq!(
    *events.lock().unwrap(),
    vec![Event::Error("scheduler `immediate` is already shut down".to_string())]
  );
}

#[test]
fn nested_inline_subscribe_delivers_before_returning() {
  let ctx = Context::default();
  let inline = ctx.immediate_scheduler();
  let observed = Arc::new(Mutex::new(vec![]));
  let (c_ctx, c_inline, c_observed) = (ctx.clone(), inline.clone(), observed.clone());
  ctx.range(0, 1).subscribe_on(inline).subscribe(move |_| {
    let sum = Arc::new(AtomicUsize::new(0));
    let c_sum = sum.clone();
    c_ctx.range(1, 5).subscribe_on(c_inline.clone()).subscribe(move |v| {
      c_sum.fetch_add(v as usize, Ordering::SeqCst);
    });
    c_observed.lock().unwrap().push(sum.load(Ordering::SeqCst));
  });
  assert_eq!(*observed.lock().unwrap(), vec![10]);
  ctx.dispose();
}

#[test]
fn disposing_context_ends_pool_delivery_with_error() {
  let ctx = Context::new(Config { pool_size: 2, ..Config::default() });
  let (first_tx, first_rx) = channel();
  let (err_tx, err_rx) = channel();
  ctx.integers(0).subscribe_err(
    move |v| {
      if v == 0 {
        first_tx.send(()).unwrap();
      }
    },
    move |e| err_tx.send(e.as_label()).unwrap(),
  );
  first_rx.recv_timeout(Duration::from_secs(10)).unwrap();
  ctx.dispose();
  assert_eq!(err_rx.recv_timeout(Duration::from_secs(10)).unwrap(), "scheduler_shutdown");
}

#[test]
fn parallel_consumer_panic_is_single_error() {
  let ctx = Context::new(Config { pool_size: 4, ..Config::default() });
  let errors = Arc::new(Mutex::new(vec![]));
  let completions = Arc::new(AtomicUsize::new(0));
  let (tx, rx) = channel();
  let (c_errors, c_completions) = (errors.clone(), completions.clone());
  ctx.range(0, 1000).parallel().subscribe_all(
    |v| {
      if v == 500 {
        panic!("cannot handle {v}");
      }
    },
    move |e| {
      c_errors.lock().unwrap().push(e.as_label());
      let _ = tx.send(());
    },
    move || {
      c_completions.fetch_add(1, Ordering::SeqCst);
    },
  );
  rx.recv_timeout(Duration::from_secs(10)).unwrap();
  // let the other branches notice the terminated subscriber
  thread::sleep(Duration::from_millis(100));
  assert_eq!(*errors.lock().unwrap(), vec!["consumer_panic"]);
  assert_eq!(completions.load(Ordering::SeqCst), 0);
  ctx.dispose();
}

#[test]
fn oversized_timer_interval_is_an_error() {
  let ctx = Context::new(Config { timer_interval: Duration::MAX, ..Config::default() });
  let (events, done, _) = record(ctx.just(1).subscribe_on(ctx.timer_scheduler()));
  wait(&done);
  let events = events.lock().unwrap();
  assert_eq!(events.len(), 1);
  assert!(matches!(&events[0], Event::Error(msg) if msg.contains("overflows the clock")));
}

#[test]
fn guard_disposes_on_drop() {
  let ctx = Context::default();
  let subscription = ctx.never::<i32>().subscribe(|_| {});
  {
    let _guard = subscription.clone().dispose_when_dropped();
  }
  assert!(subscription.is_disposed());
}
