use std::collections::VecDeque;

use super::{BoxedSource, SizeHint, Source};
use crate::error::RxError;

/// Pulls from any iterator. Not splittable.
#[derive(Clone, Debug)]
pub struct IterSource<I>(I);

impl<I> IterSource<I> {
  pub fn new(iter: I) -> Self { IterSource(iter) }
}

impl<I> Source<I::Item> for IterSource<I>
where
  I: Iterator + Send,
{
  #[inline]
  fn try_next(&mut self) -> Result<Option<I::Item>, RxError> { Ok(self.0.next()) }

  fn size_hint(&self) -> SizeHint { SizeHint::from_iter_hint(self.0.size_hint()) }
}

/// Pulls from an iterator of results; an `Err` item is a production failure.
#[derive(Clone, Debug)]
pub struct FallibleIterSource<I>(I);

impl<I> FallibleIterSource<I> {
  pub fn new(iter: I) -> Self { FallibleIterSource(iter) }
}

impl<T, I> Source<T> for FallibleIterSource<I>
where
  I: Iterator<Item = Result<T, RxError>> + Send,
{
  #[inline]
  fn try_next(&mut self) -> Result<Option<T>, RxError> { self.0.next().transpose() }

  fn size_hint(&self) -> SizeHint { SizeHint::from_iter_hint(self.0.size_hint()) }
}

/// Owned elements in memory. Splits in halves.
#[derive(Clone, Debug)]
pub struct VecSource<T>(VecDeque<T>);

impl<T> VecSource<T> {
  pub fn new(items: Vec<T>) -> Self { VecSource(items.into()) }
}

impl<T: Send + 'static> Source<T> for VecSource<T> {
  #[inline]
  fn try_next(&mut self) -> Result<Option<T>, RxError> { Ok(self.0.pop_front()) }

  fn try_split(&mut self) -> Option<BoxedSource<T>> {
    let mid = self.0.len() / 2;
    if mid == 0 {
      return None;
    }
    let rest = self.0.split_off(mid);
    let prefix = std::mem::replace(&mut self.0, rest);
    Some(Box::new(VecSource(prefix)))
  }

  fn size_hint(&self) -> SizeHint { SizeHint::Bounded(self.0.len()) }

  fn is_splittable(&self) -> bool { true }
}
