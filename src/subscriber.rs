//! The gate between delivery loops and consumer callbacks.
//!
//! Every observer gets converted to a [`Subscriber`] at subscribe time. Delivery
//! loops only ever talk to the subscriber, which enforces the lifecycle:
//! `on_next` only while active, exactly one terminal notification, nothing
//! after dispose.

use std::{
  panic::{catch_unwind, AssertUnwindSafe},
  sync::{Arc, Mutex, PoisonError},
};

use crate::{
  error::RxError,
  observer::{CompleteFn, Emitter, ErrorFn, NextFn, Observer},
  subscription::{Cancelable, Status, Subscription, SubscriptionLike, SubscriptionState},
};

struct Terminals {
  on_error: Option<ErrorFn>,
  on_completed: Option<CompleteFn>,
}

struct Inner<T> {
  state: Arc<SubscriptionState>,
  on_next: NextFn<T>,
  terminals: Mutex<Terminals>,
}

/// Cloneable, thread-safe subscriber shared by all branches of one delivery.
pub struct Subscriber<T>(Arc<Inner<T>>);

impl<T> Clone for Subscriber<T> {
  fn clone(&self) -> Self { Subscriber(self.0.clone()) }
}

impl<T> Subscriber<T> {
  pub fn new(observer: Observer<T>) -> Self {
    let Observer { on_next, on_error, on_completed } = observer;
    Subscriber(Arc::new(Inner {
      state: Arc::new(SubscriptionState::new()),
      on_next,
      terminals: Mutex::new(Terminals { on_error, on_completed }),
    }))
  }

  /// The consumer-facing handle sharing this subscriber's status.
  pub fn subscription(&self) -> Subscription { Subscription(self.0.state.clone()) }

  /// Attaches a resource that is cancelled when the subscription is disposed.
  pub fn add<C: Cancelable + 'static>(&self, cancelable: C) { self.0.state.add(cancelable) }

  #[inline]
  pub fn status(&self) -> Status { self.0.state.status() }

  #[inline]
  pub fn is_active(&self) -> bool { self.0.state.is_active() }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.0.state.is_disposed() }

  #[inline]
  pub fn is_terminated(&self) -> bool { self.status() == Status::Terminated }

  pub fn dispose(&self) { self.0.state.dispose() }

  /// Delivers one element while active.
  ///
  /// A panic raised by `on_next` becomes the terminal failure. Returns
  /// whether the subscriber is still active, so the caller knows whether to
  /// keep producing.
  pub fn notify_next(&self, value: T) -> bool {
    if !self.is_active() {
      return false;
    }
    let on_next = &self.0.on_next;
    match catch_unwind(AssertUnwindSafe(|| on_next(value))) {
      Ok(()) => self.is_active(),
      Err(payload) => {
        self.notify_error(RxError::consumer_panic(payload));
        false
      }
    }
  }

  /// Delivers the terminal failure, at most once.
  pub fn notify_error(&self, err: RxError) {
    if !self.0.state.try_terminate() {
      log::trace!("suppressed error after termination: {err}");
      return;
    }
    log::warn!("subscription failed ({}): {err}", err.as_label());
    let on_error = self.terminals().on_error.take();
    self.terminals().on_completed = None;
    if let Some(on_error) = on_error {
      if let Err(payload) = catch_unwind(AssertUnwindSafe(move || on_error(err))) {
        log::error!(
          "on_error callback panicked: {}",
          crate::error::panic_message(payload.as_ref())
        );
      }
    }
  }

  /// Delivers the terminal completion, at most once.
  pub fn notify_completed(&self) {
    if !self.0.state.try_terminate() {
      return;
    }
    let on_completed = self.terminals().on_completed.take();
    self.terminals().on_error = None;
    if let Some(on_completed) = on_completed {
      if let Err(payload) = catch_unwind(AssertUnwindSafe(on_completed)) {
        log::error!(
          "on_completed callback panicked: {}",
          crate::error::panic_message(payload.as_ref())
        );
      }
    }
  }

  fn terminals(&self) -> std::sync::MutexGuard<'_, Terminals> {
    self.0.terminals.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> Emitter<T> for Subscriber<T> {
  #[inline]
  fn next(&mut self, value: T) { self.notify_next(value); }

  #[inline]
  fn error(&mut self, err: RxError) { self.notify_error(err); }

  #[inline]
  fn complete(&mut self) { self.notify_completed(); }

  #[inline]
  fn is_disposed(&self) -> bool { !Subscriber::is_active(self) }
}
