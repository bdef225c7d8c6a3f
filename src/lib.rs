//! # Ironseq
//!
//! A library of **lazily evaluated, composable sequence transformations** over
//! indexable and non-indexable sources. A pipeline of operators (map, filter,
//! slice, flat-map, group, search, fold, remove, replace, window, ...) is built
//! on top of a source without computing anything; elements are produced only
//! when pulled, and random access is kept wherever the source allows it.
//!
//! ## Key Features
//!
//! - **Two node families** - random-access [`ListMaterializer`] nodes and
//!   sequential [`IteratorMaterializer`] nodes, with the same operator set
//! - **Lazy construction** - building a pipeline never touches the source
//! - **Memoization** - every element or one-time result is computed at most
//!   once per node and answered from cache afterwards
//! - **Negative bounds** - `slice(-3, -1)` counts from the end, resolved once
//! - **Fail-fast concurrency** - overlapping computations of the same node
//!   fail with [`SequenceError::ConcurrentModification`] instead of blocking
//! - **Exception recovery** - `map_exceptionally` / `flat_map_exceptionally`
//!   replace elements whose callbacks failed
//!
//! ## Quick Start
//!
//! ```
//! use ironseq::ListSequence;
//!
//! let words = ListSequence::from_vec(vec!["lazy", "sequences", "in", "rust"]);
//! let long = words
//!     .filter(|w: &&str| w.len() > 2)
//!     .map(|w: &&str| w.to_uppercase());
//!
//! assert_eq!(long.get(1)?, "SEQUENCES");
//! assert_eq!(long.len()?, 3);
//! assert!(long.ends_with(vec!["RUST".to_string()]).get(0)?);
//! # Ok::<(), ironseq::SequenceError>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Handles
//!
//! [`ListSequence<E>`] wraps a shared list node; it is cheap to clone and its
//! operators borrow it. [`IteratorSequence<E>`] owns a sequential node, is
//! consumed by its operators and also implements
//! [`Iterator<Item = Result<E>>`](Iterator). Both expose the same operators.
//!
//! ### Operator families
//!
//! - **Structural** - `slice`, `take`/`drop` (either end, by count or while),
//!   `insert_at`, `remove_*`, `replace_*`, `resize`, `reverse`, `append`/`prepend`
//! - **Transform** - `map`, `peek`, `flat_map` (whole or position-scoped),
//!   folds and reductions from either end, exceptional recovery
//! - **Aggregate/search** - `all`, `exists`, `count`, `find_*`, `index_*`,
//!   `starts_with`, `ends_with`, `includes*`
//! - **Windowing** - `group`, `window`, optionally padded
//!
//! Aggregates and searches return a zero- or one-element sequence, computed
//! on first demand.
//!
//! ### Errors
//!
//! Every pulling call returns [`Result<T>`] with a single [`SequenceError`].
//! Callbacks of the `try_*` operators return [`anyhow::Result`]; their
//! failures surface as [`SequenceError::Callback`].
//!
//! ## Module Overview
//!
//! - [`node`] - The two node contracts and the callback aliases
//! - [`sequence`] - The public handles
//! - [`sources`] - Source nodes over slices, iterators, repeated values and text
//! - [`cached`] - Memoizing list over a lazily pulled iterator
//! - [`config`] - Process-wide tuning knobs
//! - [`error`] - Error type and argument helpers
//! - [`utils`] - Index arithmetic
//! - [`testing`] - Assertions and instrumented source nodes for tests

pub mod cached;
pub mod config;
pub mod error;
pub mod node;
pub mod sequence;
pub mod sources;
pub mod testing;
pub mod utils;

pub(crate) mod helpers;
pub(crate) mod scratch;
pub(crate) mod state;

pub use error::{Result, SequenceError};
pub use node::{ArcList, BoxIter, IteratorMaterializer, ListMaterializer};
pub use sequence::{IteratorSequence, ListSequence, SeqBound};
