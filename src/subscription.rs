//! Subscription handles, lifecycle status and cancellation flags.
//!
//! A [`Subscription`] is returned by every `subscribe*` call. It is the only
//! value shared between the consumer thread and the delivery threads, so all
//! of its state is atomic: a three-valued [`Status`] that moves
//! `Active -> Terminated` at most once and `Active | Terminated -> Disposed`
//! idempotently, plus a list of [`Cancelable`] resources that are signalled
//! on dispose.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc, Mutex, PoisonError,
  },
};

use smallvec::SmallVec;

/// Subscription returned from `subscribe` to allow disposing.
pub trait SubscriptionLike {
  /// Stops delivery. Calling it more than once has no further effect.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;

  /// Whether notifications are still being delivered.
  fn is_active(&self) -> bool;
}

/// A resource that can be told to stop, e.g. a parallel traversal.
pub trait Cancelable: Send + Sync {
  fn cancel(&self);

  fn is_canceled(&self) -> bool;
}

// ==================== CancelFlag ====================

/// Shared atomic cancellation flag.
///
/// Cloning shares the flag. Delivery loops read it before every unit of
/// work; only the owning subscription sets it.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn new() -> Self { Self::default() }
}

impl Cancelable for CancelFlag {
  #[inline]
  fn cancel(&self) { self.0.store(true, Ordering::Release); }

  #[inline]
  fn is_canceled(&self) -> bool { self.0.load(Ordering::Acquire) }
}

// ==================== Status ====================

/// Lifecycle status of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  /// Notifications are delivered.
  Active,
  /// A terminal notification (error or completion) was delivered.
  Terminated,
  /// The consumer disposed the subscription.
  Disposed,
}

const ACTIVE: u8 = 0;
const TERMINATED: u8 = 1;
const DISPOSED: u8 = 2;

impl Status {
  fn from_raw(raw: u8) -> Self {
    match raw {
      ACTIVE => Status::Active,
      TERMINATED => Status::Terminated,
      _ => Status::Disposed,
    }
  }
}

// ==================== SubscriptionState ====================

/// Status word plus the cancelables torn down on dispose.
pub(crate) struct SubscriptionState {
  status: AtomicU8,
  teardown: Mutex<Inner>,
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn Cancelable>; 1]>,
}

impl Inner {
  fn add(&mut self, v: Box<dyn Cancelable>) {
    if self.closed {
      v.cancel();
    } else {
      self.teardown.retain(|v| !v.is_canceled());
      self.teardown.push(v);
    }
  }

  fn cancel_all(&mut self) {
    if !self.closed {
      self.closed = true;
      for v in self.teardown.drain(..) {
        v.cancel();
      }
    }
  }
}

impl SubscriptionState {
  pub(crate) fn new() -> Self {
    SubscriptionState {
      status: AtomicU8::new(ACTIVE),
      teardown: Mutex::new(Inner { closed: false, teardown: SmallVec::new() }),
    }
  }

  #[inline]
  pub(crate) fn status(&self) -> Status { Status::from_raw(self.status.load(Ordering::Acquire)) }

  /// Moves `Active -> Terminated`. Only the caller that wins the transition
  /// may deliver the terminal notification.
  pub(crate) fn try_terminate(&self) -> bool {
    self
      .status
      .compare_exchange(ACTIVE, TERMINATED, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  pub(crate) fn add<C: Cancelable + 'static>(&self, cancelable: C) {
    self
      .teardown
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .add(Box::new(cancelable));
  }

  pub(crate) fn teardown_size(&self) -> usize {
    self
      .teardown
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .teardown
      .len()
  }
}

impl SubscriptionLike for SubscriptionState {
  fn dispose(&self) {
    let prev = self.status.swap(DISPOSED, Ordering::AcqRel);
    if prev == DISPOSED {
      return;
    }
    log::debug!("subscription disposed (was {:?})", Status::from_raw(prev));
    self
      .teardown
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .cancel_all();
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.status() == Status::Disposed }

  #[inline]
  fn is_active(&self) -> bool { self.status() == Status::Active }
}

// ==================== Subscription ====================

/// Consumer-side handle of one delivery.
#[derive(Clone)]
pub struct Subscription(pub(crate) Arc<SubscriptionState>);

impl Subscription {
  /// Current lifecycle status.
  pub fn status(&self) -> Status { self.0.status() }

  /// Whether a terminal notification was delivered (and the subscription was
  /// not disposed afterwards).
  pub fn is_terminated(&self) -> bool { self.status() == Status::Terminated }

  /// Attaches a resource to cancel on dispose. If the subscription is
  /// already disposed the resource is cancelled immediately.
  pub fn add<C: Cancelable + 'static>(&self, cancelable: C) { self.0.add(cancelable) }

  /// Activates "RAII" behavior for this subscription. That means
  /// `dispose()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `dispose()` is called immediately, which is probably not what you
  /// want!
  pub fn dispose_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn dispose(&self) { self.0.dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }

  #[inline]
  fn is_active(&self) -> bool { self.0.is_active() }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("status", &self.status())
      .field("teardown_count", &self.0.teardown_size())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be disposed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }

  pub fn inner(&self) -> &T { &self.0 }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.dispose() }
}
