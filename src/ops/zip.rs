use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// One element of a zipped sequence.
///
/// When one operand runs out before the other, the survivor's remaining
/// elements arrive alone as `Left` or `Right`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZipItem<A, B> {
  Pair(A, B),
  Left(A),
  Right(B),
}

impl<A, B> ZipItem<A, B> {
  pub fn is_pair(&self) -> bool { matches!(self, ZipItem::Pair(..)) }

  pub fn left(&self) -> Option<&A> {
    match self {
      ZipItem::Pair(a, _) | ZipItem::Left(a) => Some(a),
      ZipItem::Right(_) => None,
    }
  }

  pub fn right(&self) -> Option<&B> {
    match self {
      ZipItem::Pair(_, b) | ZipItem::Right(b) => Some(b),
      ZipItem::Left(_) => None,
    }
  }

  /// Both halves, when this is a complete pair.
  pub fn into_pair(self) -> Option<(A, B)> {
    match self {
      ZipItem::Pair(a, b) => Some((a, b)),
      _ => None,
    }
  }
}

/// Pairs up elements of two sources.
///
/// Each pull first advances the operand with the larger size estimate (`b` on
/// a tie); if that operand is exhausted the zip ends. Otherwise the other
/// operand is advanced and the two values form a pair, or the first value is
/// emitted alone when the other operand has nothing left.
pub struct ZipOp<A, B> {
  a: BoxedSource<A>,
  b: BoxedSource<B>,
}

impl<A, B> ZipOp<A, B> {
  pub fn new(a: BoxedSource<A>, b: BoxedSource<B>) -> Self { ZipOp { a, b } }
}

impl<A: 'static, B: 'static> Source<ZipItem<A, B>> for ZipOp<A, B> {
  fn try_next(&mut self) -> Result<Option<ZipItem<A, B>>, RxError> {
    if self.a.size_hint() > self.b.size_hint() {
      let Some(a) = self.a.try_next()? else { return Ok(None) };
      Ok(Some(match self.b.try_next()? {
        Some(b) => ZipItem::Pair(a, b),
        None => ZipItem::Left(a),
      }))
    } else {
      let Some(b) = self.b.try_next()? else { return Ok(None) };
      Ok(Some(match self.a.try_next()? {
        Some(a) => ZipItem::Pair(a, b),
        None => ZipItem::Right(b),
      }))
    }
  }

  fn size_hint(&self) -> SizeHint { self.a.size_hint().max(self.b.size_hint()) }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::prelude::*;

  #[test]
  fn pairs_equal_lengths() {
    let ctx = Context::default();
    let out = ctx
      .from_vec(vec!["One", "Two", "Three"])
      .zip(ctx.from_vec(vec![1, 2, 3]))
      .to_vec()
      .unwrap();
    assert_eq!(
      out,
      vec![ZipItem::Pair("One", 1), ZipItem::Pair("Two", 2), ZipItem::Pair("Three", 3)]
    );
  }

  #[test]
  fn uneven_lengths_keep_trailing_elements() {
    let ctx = Context::default();
    let out = ctx
      .from_vec(vec!["One", "Two", "Three"])
      .zip(ctx.from_vec(vec![1, 2, 3, 4]))
      .to_vec()
      .unwrap();
    assert_eq!(out.len(), 4);
    assert!(out[..3].iter().all(ZipItem::is_pair));
    assert_eq!(out[3], ZipItem::Right(4));

    let out = ctx.range(0, 3).zip(ctx.from_vec(vec!['x'])).to_vec().unwrap();
    assert_eq!(out, vec![ZipItem::Pair(0, 'x'), ZipItem::Left(1), ZipItem::Left(2)]);
  }

  #[test]
  fn empty_operand() {
    let ctx = Context::default();
    let out = ctx.empty::<i32>().zip(ctx.from_vec(vec![1, 2])).to_vec().unwrap();
    assert_eq!(out, vec![ZipItem::Right(1), ZipItem::Right(2)]);
    let out = ctx.empty::<i32>().zip(ctx.empty::<u8>()).to_vec().unwrap();
    assert!(out.is_empty());
  }

  #[test]
  fn item_accessors() {
    let item: ZipItem<i32, &str> = ZipItem::Pair(1, "a");
    assert_eq!(item.left(), Some(&1));
    assert_eq!(item.right(), Some(&"a"));
    assert_eq!(item.into_pair(), Some((1, "a")));
    assert_eq!(ZipItem::<i32, &str>::Right("b").left(), None);
  }
}
