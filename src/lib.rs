//! chain-table: a single-threaded, separate-chained hash table with
//! pluggable key behavior and per-bucket chain storage.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the hashing/bucketing engine small and explicit, with every
//!   policy it depends on (bucket selection, key equality, chain storage)
//!   supplied from outside through a trait.
//! - Layers:
//!   - `Chain<T>`: ordered per-bucket sequence with positional access and a
//!     predicate search. `VecChain` (growable array, default) and
//!     `LinkedChain` (singly linked, nodes in a generational arena).
//!   - `KeyHasher<K>` / `KeyEq<K>`: bucket selection and equality.
//!     `PolyHash` + `BytesEq` are the byte-sequence defaults; `StdHash` +
//!     `StdEq` cover any `K: Hash + Eq`; `HashFn` / `EqFn` wrap closures.
//!   - `ChainedTable<K, V, H, E, C>`: the bucket array and the operations:
//!     every keyed call computes `bucket = hasher.bucket(key, n)` and scans
//!     that chain with the equality.
//!
//! Constraints
//! - Single-threaded and synchronous; callers add locking if they share it.
//! - Bucket count is fixed per table. Nothing resizes implicitly; callers
//!   watch `load_factor()` and call `rehash`.
//! - At most one entry per key. Inserting an existing key replaces the value
//!   in place, keeps the stored key instance and returns the old value.
//!
//! Ownership
//! - `insert` moves key and value in; `remove`, replacement, `remove_entry`,
//!   owning iteration and `destroy_with` move them back out.
//! - `rehash` moves every entry into the new bucket array and never runs
//!   cleanup callbacks, so nothing handed to the new table can be released
//!   twice.
//!
//! Caller obligations
//! - `bucket(k, n)` is deterministic and lands in `[0, n)`.
//! - Keys equal under `key_eq` hash to the same bucket. Lookups through a
//!   borrowed form `Q` (e.g. `&str` for `String` keys) must agree with the
//!   owned form under both traits.
//! - None of this is validated; violations cause misses, not unsafety.
//!
//! Size accounting
//! - `len()` is an incrementally maintained counter (O(1)). `bucket_lens()`
//!   re-derives the per-chain picture in O(buckets).
//!
//! Logging
//! - Emits through the `log` facade: `debug!` for rehash, `trace!` for
//!   allocation and teardown. The crate never installs a logger.

pub mod chain;
pub mod chained_table;
mod chained_table_proptest;
pub mod config;
pub mod error;
pub mod hashing;
pub mod linked_chain;

// Public surface
pub use chain::{Chain, VecChain};
pub use chained_table::{ChainedTable, Entry};
pub use config::{BucketCount, TableBuilder, DEFAULT_BUCKET_COUNT};
pub use error::TableError;
pub use hashing::{BytesEq, EqFn, HashFn, KeyEq, KeyHasher, PolyHash, StdEq, StdHash};
pub use linked_chain::LinkedChain;
