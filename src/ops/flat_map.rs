use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Maps each element to an iterable and flattens the results in order.
pub struct FlatMapOp<T, F, I: IntoIterator> {
  source: BoxedSource<T>,
  func: F,
  current: Option<I::IntoIter>,
}

impl<T, F, I: IntoIterator> FlatMapOp<T, F, I> {
  pub fn new(source: BoxedSource<T>, func: F) -> Self { FlatMapOp { source, func, current: None } }
}

impl<T, F, I> Source<I::Item> for FlatMapOp<T, F, I>
where
  T: 'static,
  F: FnMut(T) -> I + Send + 'static,
  I: IntoIterator,
  I::IntoIter: Send,
{
  fn try_next(&mut self) -> Result<Option<I::Item>, RxError> {
    loop {
      if let Some(v) = self.current.as_mut().and_then(Iterator::next) {
        return Ok(Some(v));
      }
      match self.source.try_next()? {
        Some(outer) => self.current = Some((self.func)(outer).into_iter()),
        None => {
          self.current = None;
          return Ok(None);
        }
      }
    }
  }

  fn size_hint(&self) -> SizeHint {
    let pending = self
      .current
      .as_ref()
      .map_or(SizeHint::Bounded(0), |it| SizeHint::from_iter_hint(it.size_hint()));
    match self.source.size_hint() {
      SizeHint::Bounded(0) => pending,
      _ => SizeHint::Unbounded,
    }
  }
}
