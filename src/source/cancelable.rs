use super::{BoxedSource, SizeHint, Source};
use crate::{
  error::RxError,
  subscription::{CancelFlag, Cancelable},
};

/// Refuses to yield anything once its flag is set. Splits share the flag,
/// so one `cancel` stops every branch of a parallel traversal.
pub struct CancelableSource<T> {
  source: BoxedSource<T>,
  flag: CancelFlag,
}

impl<T> CancelableSource<T> {
  pub fn new(source: BoxedSource<T>, flag: CancelFlag) -> Self { CancelableSource { source, flag } }

  pub fn flag(&self) -> &CancelFlag { &self.flag }

  #[inline]
  pub fn is_canceled(&self) -> bool { self.flag.is_canceled() }

  /// Like [`Source::try_split`] but keeps the concrete type.
  pub fn split(&mut self) -> Option<CancelableSource<T>> {
    if self.is_canceled() {
      return None;
    }
    self
      .source
      .try_split()
      .map(|source| CancelableSource { source, flag: self.flag.clone() })
  }
}

impl<T: 'static> Source<T> for CancelableSource<T> {
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    if self.is_canceled() {
      return Ok(None);
    }
    self.source.try_next()
  }

  fn try_split(&mut self) -> Option<BoxedSource<T>> {
    self.split().map(|s| Box::new(s) as BoxedSource<T>)
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint() }

  fn is_splittable(&self) -> bool { self.source.is_splittable() }
}
