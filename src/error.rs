//! Error taxonomy shared by sources, subscribers and schedulers.
//!
//! Every failure a consumer can observe arrives as one [`RxError`] through
//! `on_error`:
//!
//! - a source failing to produce the next element ([`RxError::Source`],
//!   [`RxError::Message`]),
//! - a consumer callback panicking ([`RxError::ConsumerPanic`]),
//! - a `create` producer panicking ([`RxError::ProducerPanic`]),
//! - delivery being rescheduled on a scheduler that was already disposed
//!   ([`RxError::SchedulerShutdown`]),
//! - a timer interval too large for the clock ([`RxError::IntervalOverflow`]).

use std::{any::Any, error::Error as StdError, io, sync::Arc, time::Duration};

use thiserror::Error;

/// Errors produced while building or delivering a reactive sequence.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RxError {
  /// The source sequence failed while producing an element.
  #[error("source failed: {0}")]
  Source(Arc<dyn StdError + Send + Sync>),

  /// The source sequence failed with a plain message.
  #[error("{0}")]
  Message(String),

  /// A consumer `on_next` callback panicked.
  #[error("consumer callback panicked: {message}")]
  ConsumerPanic {
    /// Panic payload rendered as text.
    message: String,
  },

  /// The producer closure given to `create` panicked.
  #[error("producer panicked: {message}")]
  ProducerPanic {
    /// Panic payload rendered as text.
    message: String,
  },

  /// Work was submitted to a scheduler after `dispose`.
  #[error("scheduler `{scheduler}` is already shut down")]
  SchedulerShutdown {
    /// Name of the refusing backend.
    scheduler: &'static str,
  },

  /// A timer interval too large to turn into a deadline.
  #[error("timer interval {interval:?} overflows the clock")]
  IntervalOverflow {
    /// The configured interval.
    interval: Duration,
  },

  /// A backend thread could not be spawned.
  #[error("failed to spawn scheduler thread: {0}")]
  Spawn(Arc<io::Error>),

  /// A blocking collector was used on an observable that never terminates.
  #[error("observable never completes")]
  NeverCompletes,
}

impl RxError {
  /// Wraps any error as a source-production failure.
  pub fn source<E>(err: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    RxError::Source(Arc::new(err))
  }

  /// Creates a source failure from a message.
  pub fn msg(message: impl Into<String>) -> Self { RxError::Message(message.into()) }

  /// Returns a short stable label (snake_case) for use in logs.
  ///
  /// ```
  /// use rxseq::RxError;
  ///
  /// assert_eq!(RxError::msg("boom").as_label(), "source_failed");
  /// assert_eq!(RxError::NeverCompletes.as_label(), "never_completes");
  /// ```
  pub fn as_label(&self) -> &'static str {
    match self {
      RxError::Source(_) | RxError::Message(_) => "source_failed",
      RxError::ConsumerPanic { .. } => "consumer_panic",
      RxError::ProducerPanic { .. } => "producer_panic",
      RxError::SchedulerShutdown { .. } => "scheduler_shutdown",
      RxError::IntervalOverflow { .. } => "interval_overflow",
      RxError::Spawn(_) => "spawn_failed",
      RxError::NeverCompletes => "never_completes",
    }
  }

  /// Whether the failure came from a consumer or producer closure panicking.
  pub fn is_panic(&self) -> bool {
    matches!(self, RxError::ConsumerPanic { .. } | RxError::ProducerPanic { .. })
  }

  pub(crate) fn consumer_panic(payload: Box<dyn Any + Send>) -> Self {
    RxError::ConsumerPanic { message: panic_message(payload.as_ref()) }
  }

  pub(crate) fn producer_panic(payload: Box<dyn Any + Send>) -> Self {
    RxError::ProducerPanic { message: panic_message(payload.as_ref()) }
  }
}

impl From<io::Error> for RxError {
  fn from(err: io::Error) -> Self { RxError::Spawn(Arc::new(err)) }
}

/// Renders a `catch_unwind` payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  }
}
