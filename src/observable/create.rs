use std::{
  marker::PhantomData,
  panic::{catch_unwind, AssertUnwindSafe},
};

use super::Subscribe;
use crate::{
  error::RxError,
  observer::{Emitter, Observer},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Observable driven by a producer closure.
///
/// This struct is created by `ObservableFactory::create`. The producer runs
/// synchronously on the subscribing thread and pushes values through the
/// [`Emitter`] it receives. Emissions after a terminal call or after the
/// consumer disposed are dropped by the subscriber gate.
pub struct Create<T, F> {
  producer: F,
  _marker: PhantomData<fn() -> T>,
}

impl<T, F> Create<T, F> {
  pub fn new(producer: F) -> Self { Create { producer, _marker: PhantomData } }
}

impl<T, F> Subscribe<T> for Create<T, F>
where
  F: FnOnce(&mut dyn Emitter<T>),
{
  fn subscribe_observer(self, observer: Observer<T>) -> Subscription {
    let mut subscriber = Subscriber::new(observer);
    let subscription = subscriber.subscription();
    let producer = self.producer;
    let emitter: &mut dyn Emitter<T> = &mut subscriber;
    if let Err(payload) = catch_unwind(AssertUnwindSafe(move || producer(emitter))) {
      subscriber.notify_error(RxError::producer_panic(payload));
    }
    subscription
  }
}
