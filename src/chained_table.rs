//! ChainedTable: separate-chained hash table with pluggable key behavior and
//! per-bucket chain storage.

use crate::chain::{Chain, VecChain};
use crate::config::DEFAULT_BUCKET_COUNT;
use crate::error::TableError;
use crate::hashing::{BytesEq, KeyEq, KeyHasher, PolyHash};
use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;
use log::{debug, trace};

/// One stored `(key, value)` pair. Owned by the chain slot holding it.
#[derive(Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

pub struct ChainedTable<K, V, H = PolyHash, E = BytesEq, C = VecChain<Entry<K, V>>> {
    buckets: Box<[C]>,
    len: usize, // maintained on insert/remove; equals the sum of chain lengths
    hasher: H,
    equality: E,
    _pd: PhantomData<Entry<K, V>>,
}

impl<K, V> ChainedTable<K, V> {
    /// Table with `DEFAULT_BUCKET_COUNT` buckets, `PolyHash` and `BytesEq`.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Panics if `n == 0` or the bucket array cannot be allocated.
    pub fn with_buckets(n: usize) -> Self {
        Self::with_buckets_and_functions(n, PolyHash, BytesEq)
    }

    pub fn try_with_buckets(n: usize) -> Result<Self, TableError> {
        Self::try_with_buckets_and_functions(n, PolyHash, BytesEq)
    }
}

impl<K, V, H, E, C> Default for ChainedTable<K, V, H, E, C>
where
    H: Default,
    E: Default,
    C: Chain<Entry<K, V>>,
{
    fn default() -> Self {
        Self::with_buckets_and_functions(DEFAULT_BUCKET_COUNT, H::default(), E::default())
    }
}

/// Iterator over `(&K, &V)` in bucket-index, then chain-position order.
pub struct Iter<'a, K: 'a, V: 'a, C: Chain<Entry<K, V>> + 'a> {
    buckets: core::slice::Iter<'a, C>,
    current: Option<C::Iter<'a>>,
    remaining: usize,
    _pd: PhantomData<&'a (K, V)>,
}

impl<'a, K: 'a, V: 'a, C> Iterator for Iter<'a, K, V, C>
where
    C: Chain<Entry<K, V>> + 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((e.key(), e.value()));
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Owning iterator; consumes each chain front to back in bucket order.
pub struct IntoIter<K, V, C: IntoIterator> {
    buckets: std::vec::IntoIter<C>,
    current: Option<C::IntoIter>,
    remaining: usize,
    _pd: PhantomData<Entry<K, V>>,
}

impl<K, V, C> Iterator for IntoIter<K, V, C>
where
    C: Chain<Entry<K, V>>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((e.key, e.value));
            }
            self.current = Some(self.buckets.next()?.into_iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, H, E, C> ChainedTable<K, V, H, E, C>
where
    C: Chain<Entry<K, V>>,
{
    /// Panics if `n == 0` or the bucket array cannot be allocated.
    pub fn with_buckets_and_functions(n: usize, hasher: H, equality: E) -> Self {
        match Self::try_with_buckets_and_functions(n, hasher, equality) {
            Ok(table) => table,
            Err(e) => panic!("chain-table: {e}"),
        }
    }

    /// Allocates `n` empty chains up front. Either every chain exists or an
    /// error is returned; no partially built table is observable.
    pub fn try_with_buckets_and_functions(
        n: usize,
        hasher: H,
        equality: E,
    ) -> Result<Self, TableError> {
        if n == 0 {
            return Err(TableError::ZeroBuckets);
        }
        let mut buckets: Vec<C> = Vec::new();
        buckets.try_reserve_exact(n)?;
        buckets.resize_with(n, C::default);
        trace!("allocated table with {n} buckets");
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            len: 0,
            hasher,
            equality,
            _pd: PhantomData,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries. O(1); see `bucket_lens` for the per-chain view.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries per bucket. Resizing is never automatic; callers watch this.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Chain length of every bucket, in bucket-index order.
    pub fn bucket_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|c| c.len())
    }

    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
            _pd: PhantomData,
        }
    }

    /// Snapshot of every key, in bucket-index then chain-position order.
    pub fn keys(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().map(|(k, _)| k));
        out
    }

    /// Snapshot of every value, in the same order as `keys`.
    pub fn values(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().map(|(_, v)| v));
        out
    }

    /// Removes every entry; the bucket count is kept.
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            chain.drain_with(drop);
        }
        self.len = 0;
    }

    /// Tears the table down without callbacks.
    pub fn destroy(self) {
        self.destroy_with(drop, drop);
    }

    /// Tears the table down bucket by bucket. Each chain is emptied from the
    /// front; every removed entry's key goes to `key_cleanup`, then its value
    /// to `value_cleanup`. Pass `drop` for a side that needs no cleanup.
    pub fn destroy_with<FK, FV>(self, mut key_cleanup: FK, mut value_cleanup: FV)
    where
        FK: FnMut(K),
        FV: FnMut(V),
    {
        let Self { buckets, len, .. } = self;
        trace!("destroying table: {} buckets, {len} entries", buckets.len());
        for mut chain in buckets.into_vec() {
            chain.drain_with(|e| {
                key_cleanup(e.key);
                value_cleanup(e.value);
            });
        }
    }

    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        let n = self.buckets.len();
        let b = self.hasher.bucket(key, n);
        debug_assert!(b < n, "hasher returned bucket {b} for {n} buckets");
        b
    }

    /// Bucket of `key` and the chain position of its entry, if any.
    fn locate<Q>(&self, key: &Q) -> (usize, Option<usize>)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let b = self.bucket_of(key);
        let pos = self.buckets[b].find(|e| self.equality.key_eq(e.key().borrow(), key));
        (b, pos)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// The stored key (the instance kept since its first insert) and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (b, pos) = self.locate(key);
        self.buckets[b]
            .get_at(pos?)
            .map(|e| (e.key(), e.value()))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (b, pos) = self.locate(key);
        self.buckets[b].get_at_mut(pos?).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.locate(key).1.is_some()
    }

    /// Inserts or replaces. On a match the existing entry keeps its original
    /// key, the `key` argument is dropped, and the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        H: KeyHasher<K>,
        E: KeyEq<K>,
    {
        let (b, pos) = self.locate(&key);
        if let Some(e) = pos.and_then(|i| self.buckets[b].get_at_mut(i)) {
            return Some(core::mem::replace(&mut e.value, value));
        }
        self.buckets[b].append(Entry { key, value });
        self.len += 1;
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Detaches the matching entry and hands back both the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (b, pos) = self.locate(key);
        let e = self.buckets[b].remove_at(pos?)?;
        self.len -= 1;
        Some((e.key, e.value))
    }

    /// Rebuilds the table with `new_bucket_count` buckets, moving every entry.
    /// A count of `0` leaves the table untouched. Panics if the new bucket
    /// array cannot be allocated.
    pub fn rehash(mut self, new_bucket_count: usize) -> Self
    where
        H: KeyHasher<K> + Clone,
        E: KeyEq<K> + Clone,
    {
        if let Err(e) = self.try_rehash(new_bucket_count) {
            panic!("chain-table: {e}");
        }
        self
    }

    /// In-place form of `rehash`. On allocation failure the table is left
    /// exactly as it was.
    pub fn try_rehash(&mut self, new_bucket_count: usize) -> Result<(), TableError>
    where
        H: KeyHasher<K> + Clone,
        E: KeyEq<K> + Clone,
    {
        if new_bucket_count == 0 {
            debug!("rehash to 0 buckets ignored");
            return Ok(());
        }
        let next = Self::try_with_buckets_and_functions(
            new_bucket_count,
            self.hasher.clone(),
            self.equality.clone(),
        )?;
        let old = core::mem::replace(self, next);
        debug!(
            "rehashing {} entries: {} -> {} buckets",
            old.len,
            old.buckets.len(),
            new_bucket_count
        );
        // Entries move; no key or value is dropped or cloned on the way.
        for (k, v) in old {
            self.insert(k, v);
        }
        Ok(())
    }
}

impl<'a, K, V, H, E, C> IntoIterator for &'a ChainedTable<K, V, H, E, C>
where
    C: Chain<Entry<K, V>>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H, E, C> IntoIterator for ChainedTable<K, V, H, E, C>
where
    C: Chain<Entry<K, V>>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            buckets: self.buckets.into_vec().into_iter(),
            current: None,
            _pd: PhantomData,
        }
    }
}

impl<K, V, H, E, C> Extend<(K, V)> for ChainedTable<K, V, H, E, C>
where
    H: KeyHasher<K>,
    E: KeyEq<K>,
    C: Chain<Entry<K, V>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, H, E, C> FromIterator<(K, V)> for ChainedTable<K, V, H, E, C>
where
    H: KeyHasher<K> + Default,
    E: KeyEq<K> + Default,
    C: Chain<Entry<K, V>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K, V, H, E, C> fmt::Debug for ChainedTable<K, V, H, E, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Chain<Entry<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
