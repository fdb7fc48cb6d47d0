//! The pull-based sequence every observable wraps.
//!
//! A [`Source`] is lazy, possibly infinite, pulled one element at a time, and
//! optionally splittable into independent halves for parallel traversal.

use crate::error::RxError;

mod cancelable;
mod iter;
mod range;

pub use cancelable::CancelableSource;
pub use iter::{FallibleIterSource, IterSource, VecSource};
pub use range::{Naturals, RangeSource};

/// Estimated number of remaining elements.
///
/// `Bounded(n) < Unbounded`, so `max`/`min` behave as expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeHint {
  Bounded(usize),
  Unbounded,
}

impl SizeHint {
  /// The bounded estimate, `None` when unbounded.
  pub fn bounded(self) -> Option<usize> {
    match self {
      SizeHint::Bounded(n) => Some(n),
      SizeHint::Unbounded => None,
    }
  }

  pub fn saturating_add(self, other: SizeHint) -> SizeHint {
    match (self, other) {
      (SizeHint::Bounded(a), SizeHint::Bounded(b)) => SizeHint::Bounded(a.saturating_add(b)),
      _ => SizeHint::Unbounded,
    }
  }

  pub fn saturating_sub(self, n: usize) -> SizeHint {
    match self {
      SizeHint::Bounded(a) => SizeHint::Bounded(a.saturating_sub(n)),
      SizeHint::Unbounded => SizeHint::Unbounded,
    }
  }

  /// Estimate derived from `Iterator::size_hint`: the upper bound when there
  /// is one.
  pub fn from_iter_hint((lower, upper): (usize, Option<usize>)) -> SizeHint {
    match upper {
      Some(upper) => SizeHint::Bounded(upper.max(lower)),
      None => SizeHint::Unbounded,
    }
  }
}

/// A lazily produced, pullable, optionally splittable sequence.
pub trait Source<T>: Send {
  /// Pulls one element. `Ok(None)` means the sequence is exhausted.
  fn try_next(&mut self) -> Result<Option<T>, RxError>;

  /// Splits off an independent prefix and shrinks `self` to the rest.
  fn try_split(&mut self) -> Option<BoxedSource<T>> { None }

  fn size_hint(&self) -> SizeHint;

  /// Whether `try_split` can ever succeed.
  fn is_splittable(&self) -> bool { false }
}

pub type BoxedSource<T> = Box<dyn Source<T>>;

impl<T> Source<T> for BoxedSource<T> {
  #[inline]
  fn try_next(&mut self) -> Result<Option<T>, RxError> { (**self).try_next() }

  #[inline]
  fn try_split(&mut self) -> Option<BoxedSource<T>> { (**self).try_split() }

  #[inline]
  fn size_hint(&self) -> SizeHint { (**self).size_hint() }

  #[inline]
  fn is_splittable(&self) -> bool { (**self).is_splittable() }
}

/// Drains a source on the current thread.
pub(crate) fn drain<T, S: Source<T> + ?Sized>(source: &mut S) -> Result<Vec<T>, RxError> {
  let mut out = Vec::with_capacity(source.size_hint().bounded().unwrap_or(0).min(1 << 16));
  while let Some(v) = source.try_next()? {
    out.push(v);
  }
  Ok(out)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn size_hint_ordering() {
    assert!(SizeHint::Bounded(usize::MAX) < SizeHint::Unbounded);
    assert_eq!(SizeHint::Bounded(3).max(SizeHint::Bounded(4)), SizeHint::Bounded(4));
    assert_eq!(SizeHint::Bounded(3).saturating_add(SizeHint::Unbounded), SizeHint::Unbounded);
    assert_eq!(SizeHint::Bounded(3).saturating_sub(5), SizeHint::Bounded(0));
    assert_eq!(SizeHint::from_iter_hint((2, Some(7))), SizeHint::Bounded(7));
    assert_eq!(SizeHint::from_iter_hint((2, None)), SizeHint::Unbounded);
  }
}
