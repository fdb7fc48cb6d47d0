//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Context and factories
pub use crate::{
  context::{Config, Context},
  factory::ObservableFactory,
};
// Errors
pub use crate::error::RxError;
// Observables
pub use crate::observable::{Create, Observable, Subscribe};
pub use crate::ops::ZipItem;
// Observer and producer side
pub use crate::observer::{Emitter, Observer};
// Schedulers
pub use crate::scheduler::{
  Duration, ImmediateScheduler, Instant, Scheduler, SchedulerExt, SharedScheduler, Task,
  ThreadPoolScheduler, ThreadScheduler, TimerScheduler,
};
// Sources
pub use crate::source::{BoxedSource, SizeHint, Source};
// Subscription
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{
  CancelFlag, Cancelable, Status, Subscription, SubscriptionGuard, SubscriptionLike,
};
