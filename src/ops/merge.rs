use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Emits every element of `first`, then every element of `second`.
pub struct MergeOp<T> {
  first: Option<BoxedSource<T>>,
  second: BoxedSource<T>,
}

impl<T> MergeOp<T> {
  pub fn new(first: BoxedSource<T>, second: BoxedSource<T>) -> Self {
    MergeOp { first: Some(first), second }
  }
}

impl<T: 'static> Source<T> for MergeOp<T> {
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    if let Some(first) = self.first.as_mut() {
      match first.try_next()? {
        Some(v) => return Ok(Some(v)),
        None => self.first = None,
      }
    }
    self.second.try_next()
  }

  fn try_split(&mut self) -> Option<BoxedSource<T>> {
    // Hand the whole first operand to the caller, the rest becomes `second`.
    if let Some(first) = self.first.take() {
      return Some(first);
    }
    self.second.try_split()
  }

  fn size_hint(&self) -> SizeHint {
    let first = self.first.as_ref().map_or(SizeHint::Bounded(0), |s| s.size_hint());
    first.saturating_add(self.second.size_hint())
  }

  fn is_splittable(&self) -> bool {
    self.second.is_splittable() || self.first.as_ref().is_some_and(|s| s.is_splittable())
  }
}
