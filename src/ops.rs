//! Source adapters behind the `Observable` operators.
//!
//! Every operator wraps the observable's boxed [`Source`](crate::source::Source)
//! in one of these adapters. `filter` and `map` split their input and wrap both
//! halves, so a parallel observable stays parallel through them. `merge`
//! splits by handing out its first operand. The others are order-dependent
//! and unsplittable.

pub mod count;
pub mod distinct;
pub mod filter;
pub mod flat_map;
pub mod map;
pub mod merge;
pub mod skip;
pub mod sorted;
pub mod take;
pub mod zip;

pub use count::CountOp;
pub use distinct::DistinctOp;
pub use filter::FilterOp;
pub use flat_map::FlatMapOp;
pub use map::MapOp;
pub use merge::MergeOp;
pub use skip::SkipOp;
pub use sorted::SortedOp;
pub use take::TakeOp;
pub use zip::{ZipItem, ZipOp};
