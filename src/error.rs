//! Errors surfaced by the fallible constructors and `try_rehash`.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// The bucket array could not be allocated.
    #[error("failed to allocate bucket array: {0}")]
    Alloc(#[from] TryReserveError),
    /// A raw bucket count that is neither the `-1` sentinel nor positive.
    #[error("invalid bucket count {0}: expected -1 or a positive count")]
    InvalidBucketCount(isize),
    #[error("a table needs at least one bucket")]
    ZeroBuckets,
}
