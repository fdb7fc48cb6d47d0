use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Emits the number of source elements once the source is exhausted.
pub struct CountOp<T> {
  source: Option<BoxedSource<T>>,
}

impl<T> CountOp<T> {
  pub fn new(source: BoxedSource<T>) -> Self { CountOp { source: Some(source) } }
}

impl<T: 'static> Source<u64> for CountOp<T> {
  fn try_next(&mut self) -> Result<Option<u64>, RxError> {
    let Some(source) = self.source.as_mut() else { return Ok(None) };
    let mut count = 0_u64;
    while source.try_next()?.is_some() {
      count += 1;
    }
    self.source = None;
    Ok(Some(count))
  }

  fn size_hint(&self) -> SizeHint { SizeHint::Bounded(self.source.is_some() as usize) }
}
