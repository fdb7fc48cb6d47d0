//! # rxseq: push-based reactive sequences
//!
//! Wraps lazy, possibly infinite, possibly splittable sources in observables
//! that push their elements to subscribers through pluggable schedulers.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxseq::prelude::*;
//!
//! let ctx = Context::default();
//! let subscription = ctx
//!   .from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! # let _ = subscription;
//! # ctx.dispose();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Context`] | Execution environment: default scheduler and worker pool |
//! | [`Observable`] | A source plus its operators, delivered on subscribe |
//! | [`Observer`] | `on_next`, and optional `on_error` / `on_completed` |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Runs delivery units: inline, dedicated thread, pool, timer |
//!
//! [`Context`]: context::Context
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler

pub mod context;
pub mod error;
pub mod factory;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod source;
pub mod subscriber;
pub mod subscription;

pub use error::RxError;
pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
