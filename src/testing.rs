//! Testing utilities for sequence pipelines.
//!
//! This module gives downstream crates the tools this crate tests itself
//! with:
//!
//! - **Assertions**: compare what a sequence yields with expected results,
//!   and match error kinds
//! - **Instrumented sources**: source nodes that count pulls, slow down
//!   materialization, or fail at chosen positions
//!
//! # Quick Start
//!
//! ```
//! use ironseq::ListSequence;
//! use ironseq::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = CountingList::new(vec![1, 2, 3, 4]);
//! let pulls = source.counter();
//!
//! let doubled = ListSequence::from_materializer(source).map(|n: &i32| n * 2);
//! assert_eq!(pulls.get(), 0);
//!
//! assert_sequence_yields(&doubled.take(2), &[2, 4])?;
//! assert_eq!(pulls.get(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Assertion Functions
//!
//! - [`assert_collections_equal`]: exact order-dependent comparison
//! - [`assert_sequence_yields`]: a list sequence, walked by index and sequentially
//! - [`assert_iterator_yields`]: an iterator sequence, pulled to the end
//! - [`assert_error_kind`]: a result failed with the expected error variant
//!
//! # Instrumented sources
//!
//! - [`CountingList`] / [`CountingIter`]: count element materializations
//! - [`SlowList`]: sleeps in every size and element query
//! - [`FailingIter`]: reports a callback failure at chosen positions

pub mod assertions;
pub mod instrumented;

pub use assertions::*;
pub use instrumented::*;
