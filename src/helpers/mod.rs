//! Operator families, one file per family, each adding methods to
//! [`ListSequence`](crate::ListSequence) and
//! [`IteratorSequence`](crate::IteratorSequence).

pub(crate) mod aggregate;
pub(crate) mod concat;
pub(crate) mod flat_map;
pub(crate) mod fold;
pub(crate) mod map;
pub(crate) mod once;
pub(crate) mod recover;
pub(crate) mod reshape;
pub(crate) mod search;
pub(crate) mod select;
pub(crate) mod slice;
pub(crate) mod splice;
pub(crate) mod windows;
