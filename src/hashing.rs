//! Key behavior plugged into `ChainedTable`: bucket selection and equality.
//!
//! Contract shared by every pair used together in one table:
//! - `bucket(k, n)` must be deterministic and return a value in `[0, n)`.
//! - Keys judged equal by `key_eq` must map to the same bucket for every `n`.
//!
//! The table does not validate either rule. A hasher that breaks the first
//! one makes the table panic on an out-of-bounds bucket; breaking the second
//! makes lookups silently miss entries.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// "Hashable": maps a key to a bucket index in `[0, buckets)`.
pub trait KeyHasher<K: ?Sized> {
    fn bucket(&self, key: &K, buckets: usize) -> usize;
}

/// "Equatable": decides whether two keys name the same entry.
pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

/// Base of the polynomial rolling hash used by `PolyHash`.
pub const POLY_BASE: u64 = 127;

/// Polynomial rolling hash over `bytes`: `h = h * 127 + b` for each byte,
/// computed with wrapping unsigned arithmetic.
pub fn poly_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |h, &b| h.wrapping_mul(POLY_BASE).wrapping_add(u64::from(b)))
}

/// Default hasher: `poly_hash` over the key's bytes, reduced mod the bucket count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolyHash;

impl<K> KeyHasher<K> for PolyHash
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn bucket(&self, key: &K, buckets: usize) -> usize {
        (poly_hash(key.as_ref()) % buckets as u64) as usize
    }
}

/// Default equality: byte-sequence comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytesEq;

impl<K> KeyEq<K> for BytesEq
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Adapts a std-style `BuildHasher` (any `K: Hash`) to bucket selection.
#[derive(Debug, Clone, Default)]
pub struct StdHash<S = DefaultHashBuilder> {
    build: S,
}

impl<S> StdHash<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn bucket(&self, key: &K, buckets: usize) -> usize {
        (self.build.hash_one(key) % buckets as u64) as usize
    }
}

/// Equality through `K: Eq`. Pair it with a hasher consistent with `Hash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StdEq;

impl<K> KeyEq<K> for StdEq
where
    K: ?Sized + Eq,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Closure or fn pointer `(key, buckets) -> bucket` used as a hasher.
#[derive(Debug, Clone, Copy)]
pub struct HashFn<F>(pub F);

impl<K, F> KeyHasher<K> for HashFn<F>
where
    K: ?Sized,
    F: Fn(&K, usize) -> usize,
{
    #[inline]
    fn bucket(&self, key: &K, buckets: usize) -> usize {
        (self.0)(key, buckets)
    }
}

/// Closure or fn pointer `(a, b) -> bool` used as key equality.
#[derive(Debug, Clone, Copy)]
pub struct EqFn<F>(pub F);

impl<K, F> KeyEq<K> for EqFn<F>
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}
