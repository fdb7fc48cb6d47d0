use std::{collections::HashSet, hash::Hash};

use crate::{
  error::RxError,
  source::{BoxedSource, SizeHint, Source},
};

/// Emits each element only the first time it is seen.
pub struct DistinctOp<T> {
  source: BoxedSource<T>,
  seen: HashSet<T>,
}

impl<T: Eq + Hash> DistinctOp<T> {
  pub fn new(source: BoxedSource<T>) -> Self { DistinctOp { source, seen: HashSet::new() } }
}

impl<T> Source<T> for DistinctOp<T>
where
  T: Eq + Hash + Clone + Send + 'static,
{
  fn try_next(&mut self) -> Result<Option<T>, RxError> {
    while let Some(v) = self.source.try_next()? {
      if self.seen.insert(v.clone()) {
        return Ok(Some(v));
      }
    }
    Ok(None)
  }

  fn size_hint(&self) -> SizeHint { self.source.size_hint() }
}

#[cfg(test)]
mod test {
  use bencher::benchmark_group;

  use crate::prelude::*;

  #[test]
  fn drops_repeats_keeping_first_order() {
    let ctx = Context::default();
    let out = ctx.from_vec(vec![1, 2, 2, 1, 3, 2, 4]).distinct().to_vec().unwrap();
    assert_eq!(out, vec![1, 2, 3, 4]);
  }

  #[test]
  fn distinct_on_infinite_with_limit() {
    let ctx = Context::default();
    let out = ctx.integers(0).map(|v| v % 3).distinct().limit(3).to_vec().unwrap();
    assert_eq!(out, vec![0, 1, 2]);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_distinct);

  fn bench_distinct(b: &mut bencher::Bencher) { b.iter(drops_repeats_keeping_first_order); }
}
