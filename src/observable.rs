//! The observable facade.
//!
//! An [`Observable`] owns a [`Source`], an optional pending failure and the
//! [`Context`] it was built from. Operators consume the observable and return
//! a new one wrapping the transformed source. Nothing is pulled until one of
//! the `subscribe*` methods of [`Subscribe`] runs, which hands the source to
//! either the sequential [`tick`] loop or, for `parallel()` observables over
//! splittable sources, the [`parallel`] engine.
//!
//! ```
//! use rxseq::prelude::*;
//! use std::sync::mpsc::channel;
//!
//! let ctx = Context::default();
//! let (tx, rx) = channel();
//! ctx
//!   .from_vec(vec![1, 2, 3, 4])
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .subscribe_all(move |v| tx.send(v).unwrap(), |_| {}, || {});
//! let got: Vec<i32> = rx.iter().collect();
//! assert_eq!(got, vec![20, 40]);
//! ```

use std::{
  cmp::Ordering,
  collections::HashSet,
  hash::Hash,
  panic::{catch_unwind, AssertUnwindSafe},
};

use crate::{
  context::Context,
  error::RxError,
  observer::Observer,
  ops::{
    CountOp, DistinctOp, FilterOp, FlatMapOp, MapOp, MergeOp, SkipOp, SortedOp, TakeOp, ZipItem,
    ZipOp,
  },
  scheduler::SharedScheduler,
  source::{BoxedSource, Source, VecSource},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod create;
mod parallel;
mod tick;

pub use create::Create;

/// The subscribe surface shared by [`Observable`] and [`Create`].
pub trait Subscribe<T>: Sized {
  /// Starts delivery to `observer` and returns the handle controlling it.
  fn subscribe_observer(self, observer: Observer<T>) -> Subscription;

  fn subscribe<N>(self, on_next: N) -> Subscription
  where
    N: Fn(T) + Send + Sync + 'static,
  {
    self.subscribe_observer(Observer::new(on_next))
  }

  fn subscribe_err<N, E>(self, on_next: N, on_error: E) -> Subscription
  where
    N: Fn(T) + Send + Sync + 'static,
    E: FnOnce(RxError) + Send + 'static,
  {
    self.subscribe_observer(Observer::new(on_next).on_error(on_error))
  }

  fn subscribe_all<N, E, C>(self, on_next: N, on_error: E, on_completed: C) -> Subscription
  where
    N: Fn(T) + Send + Sync + 'static,
    E: FnOnce(RxError) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe_observer(Observer::new(on_next).on_error(on_error).on_completed(on_completed))
  }
}

/// A lazily evaluated sequence of `T` plus the context that delivers it.
///
/// `source == None` is the never-emitting observable: subscribing to it
/// yields no notification at all.
pub struct Observable<T> {
  source: Option<BoxedSource<T>>,
  error: Option<RxError>,
  ctx: Context,
  parallel: bool,
}

impl<T: Send + 'static> Observable<T> {
  pub(crate) fn new(ctx: Context, source: Option<BoxedSource<T>>, error: Option<RxError>) -> Self {
    Observable { source, error, ctx, parallel: false }
  }

  /// The context this observable was built from.
  pub fn context(&self) -> &Context { &self.ctx }

  /// The failure that will be delivered before any element, if any.
  pub fn pending_error(&self) -> Option<&RxError> { self.error.as_ref() }

  pub fn is_parallel(&self) -> bool { self.parallel }

  /// Whether this is the never-emitting observable.
  pub fn is_never(&self) -> bool { self.source.is_none() }

  /// Takes the underlying source out, `None` for the never observable. A
  /// pending failure is discarded.
  pub fn into_source(self) -> Option<BoxedSource<T>> { self.source }

  fn lift<R, F>(self, f: F) -> Observable<R>
  where
    F: FnOnce(BoxedSource<T>) -> BoxedSource<R>,
  {
    let Observable { source, error, ctx, parallel } = self;
    Observable { source: source.map(f), error, ctx, parallel }
  }

  // ==================== Operators ====================

  pub fn filter<F>(self, filter: F) -> Self
  where
    F: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.lift(|s| Box::new(FilterOp::new(s, filter)))
  }

  pub fn map<R, F>(self, func: F) -> Observable<R>
  where
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
  {
    self.lift(|s| Box::new(MapOp::new(s, func)))
  }

  /// Maps every element to an iterable and emits the iterables' elements in
  /// order.
  pub fn flat_map<I, F>(self, func: F) -> Observable<I::Item>
  where
    I: IntoIterator + 'static,
    I::Item: Send + 'static,
    I::IntoIter: Send + 'static,
    F: FnMut(T) -> I + Send + 'static,
  {
    self.lift(|s| Box::new(FlatMapOp::<T, F, I>::new(s, func)))
  }

  /// Emits at most `count` elements.
  pub fn limit(self, count: usize) -> Self { self.lift(|s| Box::new(TakeOp::new(s, count))) }

  pub fn skip(self, count: usize) -> Self { self.lift(|s| Box::new(SkipOp::new(s, count))) }

  /// Emits the elements in natural order once the source is exhausted.
  pub fn sorted(self) -> Self
  where
    T: Ord,
  {
    self.sorted_by(T::cmp)
  }

  pub fn sorted_by<C>(self, compare: C) -> Self
  where
    C: FnMut(&T, &T) -> Ordering + Send + 'static,
  {
    self.lift(|s| Box::new(SortedOp::new(s, compare)))
  }

  pub fn distinct(self) -> Self
  where
    T: Eq + Hash + Clone,
  {
    self.lift(|s| Box::new(DistinctOp::new(s)))
  }

  /// Emits all elements of `self`, then all elements of `other`.
  ///
  /// Despite the name this is a concatenation, not an interleaving; see
  /// [`Observable::concat`]. If either side is the never observable, so is
  /// the result.
  pub fn merge(self, other: Observable<T>) -> Self {
    let Observable { source, error, ctx, parallel } = self;
    let source = match (source, other.source) {
      (Some(first), Some(second)) => Some(Box::new(MergeOp::new(first, second)) as BoxedSource<T>),
      _ => None,
    };
    Observable { source, error: error.or(other.error), ctx, parallel }
  }

  /// Same as [`Observable::merge`].
  pub fn concat(self, other: Observable<T>) -> Self { self.merge(other) }

  /// Pairs up the elements of `self` and `other`. Unpaired trailing
  /// elements of the longer side are emitted alone.
  pub fn zip<U: Send + 'static>(self, other: Observable<U>) -> Observable<ZipItem<T, U>> {
    let Observable { source, error, ctx, parallel } = self;
    let source = match (source, other.source) {
      (Some(a), Some(b)) => Some(Box::new(ZipOp::new(a, b)) as BoxedSource<ZipItem<T, U>>),
      _ => None,
    };
    Observable { source, error: error.or(other.error), ctx, parallel }
  }

  /// Emits the number of elements, then completes.
  pub fn count(self) -> Observable<u64> { self.lift(|s| Box::new(CountOp::new(s))) }

  /// Requests parallel delivery on the context's worker pool. Only honoured
  /// when the source is splittable; otherwise delivery stays sequential.
  pub fn parallel(mut self) -> Self {
    self.parallel = true;
    self
  }

  /// Delivers sequentially through `scheduler` instead of the context's
  /// default.
  pub fn subscribe_on(mut self, scheduler: SharedScheduler) -> Self {
    self.ctx = self.ctx.with_scheduler(scheduler);
    self
  }

  // ==================== Blocking collectors ====================

  /// Drains the observable on the calling thread.
  pub fn to_vec(self) -> Result<Vec<T>, RxError> {
    if let Some(err) = self.error {
      return Err(err);
    }
    let mut source = self.source.ok_or(RxError::NeverCompletes)?;
    let mut out = Vec::new();
    while let Some(v) = pull(&mut source)? {
      out.push(v);
    }
    Ok(out)
  }

  pub fn to_set(self) -> Result<HashSet<T>, RxError>
  where
    T: Eq + Hash,
  {
    Ok(self.to_vec()?.into_iter().collect())
  }
}

impl<T: Send + 'static> Subscribe<T> for Observable<T> {
  fn subscribe_observer(self, observer: Observer<T>) -> Subscription {
    let subscriber = Subscriber::new(observer);
    let subscription = subscriber.subscription();
    let Observable { source, error, ctx, parallel } = self;
    let source = match (source, &error) {
      (Some(source), _) => source,
      // a failure still reaches subscribers of a never-emitting observable
      (None, Some(_)) => Box::new(VecSource::new(Vec::new())),
      (None, None) => return subscription,
    };
    if parallel && error.is_none() && source.is_splittable() {
      parallel::start(source, subscriber, ctx.worker_pool().clone(), ctx.batch_factor());
    } else {
      tick::TickLoop::new(source, error, ctx.scheduler().clone(), subscriber).start();
    }
    subscription
  }
}

/// Pulls one element, turning a panicking source into a producer failure.
pub(crate) fn pull<T, S: Source<T> + ?Sized>(source: &mut S) -> Result<Option<T>, RxError> {
  catch_unwind(AssertUnwindSafe(|| source.try_next()))
    .unwrap_or_else(|payload| Err(RxError::producer_panic(payload)))
}
