use std::sync::Arc;

use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Emit only those items that pass a predicate test.
pub struct FilterOp<T, F> {
  source: BoxedSource<T>,
  filter: Arc<F>,
}

impl<T, F> FilterOp<T, F> {
  pub fn new(source: BoxedSource<T>, filter: F) -> Self { FilterOp { source, filter: Arc::new(filter) } }
}

impl<T, F> Source<T> for FilterOp<T, F>
where
  T: 'static,
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    while let Some(v) = self.source.try_next()? {
      if (self.filter)(&v) {
        return Ok(Some(v));
      }
    }
    Ok(None)
  }

  fn try_split(&mut self) -> Option<BoxedSource<T>> {
    let filter = self.filter.clone();
    self
      .source
      .try_split()
      .map(|source| Box::new(FilterOp { source, filter }) as BoxedSource<T>)
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint() }

  fn is_splittable(&self) -> bool { self.source.is_splittable() }
}
