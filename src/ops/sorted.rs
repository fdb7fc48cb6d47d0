use std::{cmp::Ordering, collections::VecDeque};

use crate::{
  error::RxError,
  source::{drain, BoxedSource, SizeHint, Source},
};

/// Emits the source's elements in sorted order. The whole source is pulled
/// on the first request, so it must be finite.
pub struct SortedOp<T, C> {
  source: Option<BoxedSource<T>>,
  sorted: VecDeque<T>,
  compare: C,
}

impl<T, C> SortedOp<T, C> {
  pub fn new(source: BoxedSource<T>, compare: C) -> Self {
    SortedOp { source: Some(source), sorted: VecDeque::new(), compare }
  }
}

impl<T, C> Source<T> for SortedOp<T, C>
where
  T: Send + 'static,
  C: FnMut(&T, &T) -> Ordering + Send + 'static,
{
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    if let Some(mut source) = self.source.take() {
      let mut items = drain(&mut source)?;
      items.sort_by(&mut self.compare);
      self.sorted = items.into();
    }
    Ok(self.sorted.pop_front())
  }

  fn size_hint(&self) -> SizeHint {
    match &self.source {
      Some(source) => source.size_hint(),
      None => SizeHint::Bounded(self.sorted.len()),
    }
  }
}
