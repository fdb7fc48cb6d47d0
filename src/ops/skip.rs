use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Ignores the first `count` elements.
pub struct SkipOp<T> {
  source: BoxedSource<T>,
  count: usize,
}

impl<T> SkipOp<T> {
  pub fn new(source: BoxedSource<T>, count: usize) -> Self { SkipOp { source, count } }
}

impl<T: 'static> Source<T> for SkipOp<T> {
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    while self.count > 0 {
      if self.source.try_next()?.is_none() {
        self.count = 0;
        return Ok(None);
      }
      self.count -= 1;
    }
    self.source.try_next()
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint().saturating_sub(self.count) }
}
