//! Feature hashing and sparse vector accumulation.

mod hash;
mod sparse;

pub use hash::{sdbm, FeatureHasher, SdbmHasher};
pub use sparse::{SparseAccumulator, SparseVector};
