use super::{BoxedSource, SizeHint, Source};
use crate::error::RxError;

/// The half-open integer range `[from, to)`. Splits at an even midpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeSource {
  from: i64,
  to: i64,
}

impl RangeSource {
  pub fn new(from: i64, to: i64) -> Self { RangeSource { from, to: to.max(from) } }
}

impl Source<i64> for RangeSource {
  fn try_next(&mut self) -> Result<Option<i64>, RxError> {
    if self.from < self.to {
      let v = self.from;
      self.from += 1;
      Ok(Some(v))
    } else {
      Ok(None)
    }
  }

  fn try_split(&mut self) -> Option<BoxedSource<i64>> {
    let lo = self.from;
    let mid = (lo + (self.to.abs_diff(lo) / 2) as i64) & !1;
    if lo < mid {
      self.from = mid;
      Some(Box::new(RangeSource { from: lo, to: mid }))
    } else {
      None
    }
  }

  fn size_hint(&self) -> SizeHint {
    SizeHint::Bounded(usize::try_from(self.to.abs_diff(self.from)).unwrap_or(usize::MAX))
  }

  fn is_splittable(&self) -> bool { true }
}

/// Natural numbers counting up from a start value. Infinite, not splittable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Naturals {
  next: Option<i64>,
}

impl Naturals {
  pub fn new(from: i64) -> Self { Naturals { next: Some(from) } }
}

impl Source<i64> for Naturals {
  fn try_next(&mut self) -> Result<Option<i64>, RxError> {
    let current = self.next;
    self.next = current.and_then(|v| v.checked_add(1));
    Ok(current)
  }

  fn size_hint(&self) -> SizeHint { SizeHint::Unbounded }
}
