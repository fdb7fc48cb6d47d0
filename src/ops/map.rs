use std::sync::Arc;

use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Calls a closure on each element and uses its return as the value.
pub struct MapOp<T, F> {
  source: BoxedSource<T>,
  func: Arc<F>,
}

impl<T, F> MapOp<T, F> {
  pub fn new(source: BoxedSource<T>, func: F) -> Self { MapOp { source, func: Arc::new(func) } }
}

impl<T, R, F> Source<R> for MapOp<T, F>
where
  T: 'static,
  R: 'static,
  F: Fn(T) -> R + Send + Sync + 'static,
{
  #[inline]
  fn try_next(&mut self) -> Result<Option<R>, RxError> {
    Ok(self.source.try_next()?.map(|v| (self.func)(v)))
  }

  fn try_split(&mut self) -> Option<BoxedSource<R>> {
    let func = self.func.clone();
    self
      .source
      .try_split()
      .map(|source| Box::new(MapOp { source, func }) as BoxedSource<R>)
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint() }

  fn is_splittable(&self) -> bool { self.source.is_splittable() }
}
