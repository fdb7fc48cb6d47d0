use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Emits at most the first `count` elements.
pub struct TakeOp<T> {
  source: BoxedSource<T>,
  count: usize,
}

impl<T> TakeOp<T> {
  pub fn new(source: BoxedSource<T>, count: usize) -> Self { TakeOp { source, count } }
}

impl<T: 'static> Source<T> for TakeOp<T> {
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    if self.count == 0 {
      return Ok(None);
    }
    let v = self.source.try_next()?;
    self.count = if v.is_some() { self.count - 1 } else { 0 };
    Ok(v)
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint().min(SizeHint::Bounded(self.count)) }
}
