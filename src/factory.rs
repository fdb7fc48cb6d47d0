//! Observable factory pattern
//!
//! The `ObservableFactory` trait is the entry point for building observables.
//! It is implemented for [`Context`], so every observable carries the
//! scheduler and worker pool of the context that created it.
//!
//! ```rust
//! use rxseq::prelude::*;
//!
//! let ctx = Context::default();
//! assert_eq!(ctx.just(42).to_vec().unwrap(), vec![42]);
//! assert_eq!(ctx.range(1, 4).to_vec().unwrap(), vec![1, 2, 3]);
//! ```
//!
//! ## Trivial Observables
//!
//! | Method | Completion | Values Emitted | Error Emitted |
//! |--------|------------|----------------|---------------|
//! | `empty()` | Yes | None | None |
//! | `never()` | No | None | None |
//! | `throwing(err)` | No | None | Yes |

use crate::{
  context::Context,
  error::RxError,
  observable::{Create, Observable},
  observer::Emitter,
  source::{FallibleIterSource, IterSource, Naturals, RangeSource, Source, VecSource},
};

pub trait ObservableFactory {
  /// The context new observables are bound to.
  fn context(&self) -> &Context;

  /// Wraps any [`Source`] implementation.
  fn from_source<T, S>(&self, source: S) -> Observable<T>
  where
    T: Send + 'static,
    S: Source<T> + 'static,
  {
    Observable::new(self.context().clone(), Some(Box::new(source)), None)
  }

  /// Emits the items of an iterator. The resulting source is not splittable;
  /// use [`ObservableFactory::from_vec`] for parallel delivery.
  fn from_iter<I>(&self, iter: I) -> Observable<I::Item>
  where
    I: IntoIterator,
    I::Item: Send + 'static,
    I::IntoIter: Send + 'static,
  {
    self.from_source(IterSource::new(iter.into_iter()))
  }

  /// Emits the elements of a vector. Splittable.
  fn from_vec<T: Send + 'static>(&self, items: Vec<T>) -> Observable<T> {
    self.from_source(VecSource::new(items))
  }

  /// Emits the `Ok` items; the first `Err` item ends the sequence with that
  /// failure.
  fn from_results<T, I>(&self, iter: I) -> Observable<T>
  where
    T: Send + 'static,
    I: IntoIterator<Item = Result<T, RxError>>,
    I::IntoIter: Send + 'static,
  {
    self.from_source(FallibleIterSource::new(iter.into_iter()))
  }

  /// Emits `from..to`. Splittable.
  fn range(&self, from: i64, to: i64) -> Observable<i64> { self.from_source(RangeSource::new(from, to)) }

  /// Emits `from, from + 1, ...` without end.
  fn integers(&self, from: i64) -> Observable<i64> { self.from_source(Naturals::new(from)) }

  fn just<T: Send + 'static>(&self, value: T) -> Observable<T> { self.from_vec(vec![value]) }

  fn empty<T: Send + 'static>(&self) -> Observable<T> { self.from_vec(Vec::new()) }

  /// Delivers `err` to every subscriber without emitting anything.
  fn throwing<T: Send + 'static>(&self, err: RxError) -> Observable<T> {
    Observable::new(self.context().clone(), Some(Box::new(VecSource::new(Vec::new()))), Some(err))
  }

  /// Never emits, never terminates.
  fn never<T: Send + 'static>(&self) -> Observable<T> { Observable::new(self.context().clone(), None, None) }

  /// Builds an observable from a producer closure that runs synchronously on
  /// subscribe.
  fn create<T, F>(&self, producer: F) -> Create<T, F>
  where
    F: FnOnce(&mut dyn Emitter<T>),
  {
    Create::new(producer)
  }
}

impl ObservableFactory for Context {
  fn context(&self) -> &Context { self }
}
