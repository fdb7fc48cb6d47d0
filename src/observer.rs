//! Consumer callbacks and the producer-facing `Emitter` trait.
//!
//! An [`Observer`] is three independently optional callbacks rather than a
//! trait object, so `subscribe(next)`, `subscribe_err(next, error)` and
//! `subscribe_all(next, error, completed)` are all the same value with
//! different fields filled in.

use std::fmt::{Debug, Formatter};

use crate::error::RxError;

/// Callback for each delivered element. It may be invoked concurrently from
/// several worker threads when the observable is delivered in parallel.
pub type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;

/// Callback for the terminal failure. Invoked at most once.
pub type ErrorFn = Box<dyn FnOnce(RxError) + Send>;

/// Callback for the terminal completion. Invoked at most once.
pub type CompleteFn = Box<dyn FnOnce() + Send>;

// ============================================================================
// Observer
// ============================================================================

/// The consumer of an observable: `on_next` is required, the terminal
/// callbacks are optional.
///
/// ```
/// use rxseq::prelude::*;
///
/// let observer = Observer::new(|v: i32| println!("{v}"))
///   .on_error(|e| eprintln!("failed: {e}"))
///   .on_completed(|| println!("done"));
/// assert!(observer.has_on_error());
/// ```
pub struct Observer<T> {
  pub(crate) on_next: NextFn<T>,
  pub(crate) on_error: Option<ErrorFn>,
  pub(crate) on_completed: Option<CompleteFn>,
}

impl<T> Observer<T> {
  pub fn new<N>(on_next: N) -> Self
  where
    N: Fn(T) + Send + Sync + 'static,
  {
    Observer { on_next: Box::new(on_next), on_error: None, on_completed: None }
  }

  pub fn on_error<E>(mut self, on_error: E) -> Self
  where
    E: FnOnce(RxError) + Send + 'static,
  {
    self.on_error = Some(Box::new(on_error));
    self
  }

  pub fn on_completed<C>(mut self, on_completed: C) -> Self
  where
    C: FnOnce() + Send + 'static,
  {
    self.on_completed = Some(Box::new(on_completed));
    self
  }

  pub fn has_on_error(&self) -> bool { self.on_error.is_some() }

  pub fn has_on_completed(&self) -> bool { self.on_completed.is_some() }
}

impl<T> Debug for Observer<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Observer")
      .field("on_error", &self.has_on_error())
      .field("on_completed", &self.has_on_completed())
      .finish()
  }
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to a subscriber via mutable reference.
///
/// This is what the producer closure of `create` receives. All methods go
/// through the subscription gate, so calls after a terminal notification or
/// after dispose are silently ignored.
pub trait Emitter<T> {
  fn next(&mut self, value: T);
  fn error(&mut self, err: RxError);
  fn complete(&mut self);

  /// Producers should poll this to stop early once the consumer disposed.
  fn is_disposed(&self) -> bool;
}
