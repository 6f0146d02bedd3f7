//! Construction-time configuration: bucket count selection and `TableBuilder`.

use crate::chain::Chain;
use crate::chained_table::{ChainedTable, Entry};
use crate::error::TableError;
use crate::hashing::{BytesEq, PolyHash};
use core::num::NonZeroUsize;

/// Bucket count used when none is requested.
pub const DEFAULT_BUCKET_COUNT: usize = 101;

/// Raw bucket count that selects `DEFAULT_BUCKET_COUNT`.
pub const DEFAULT_SENTINEL: isize = -1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketCount {
    #[default]
    Default,
    Exact(NonZeroUsize),
}

impl BucketCount {
    /// Interprets a signed count: `-1` selects the default, positive values
    /// are taken literally, everything else is rejected.
    pub fn from_raw(raw: isize) -> Result<Self, TableError> {
        match raw {
            DEFAULT_SENTINEL => Ok(BucketCount::Default),
            0 => Err(TableError::ZeroBuckets),
            n if n < 0 => Err(TableError::InvalidBucketCount(n)),
            n => Self::exact(n.unsigned_abs()),
        }
    }

    pub fn exact(n: usize) -> Result<Self, TableError> {
        NonZeroUsize::new(n)
            .map(BucketCount::Exact)
            .ok_or(TableError::ZeroBuckets)
    }

    pub fn get(self) -> usize {
        match self {
            BucketCount::Default => DEFAULT_BUCKET_COUNT,
            BucketCount::Exact(n) => n.get(),
        }
    }
}

/// Builder collecting the optional construction parameters of a table.
///
/// ```
/// use chain_table::{ChainedTable, TableBuilder};
///
/// let t: ChainedTable<String, i32> = TableBuilder::new().bucket_count(8).build();
/// assert_eq!(t.bucket_count(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder<H = PolyHash, E = BytesEq> {
    raw_buckets: isize,
    hasher: H,
    equality: E,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            raw_buckets: DEFAULT_SENTINEL,
            hasher: PolyHash,
            equality: BytesEq,
        }
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E> TableBuilder<H, E> {
    pub fn bucket_count(mut self, n: usize) -> Self {
        // Counts beyond isize::MAX can never be allocated anyway.
        self.raw_buckets = isize::try_from(n).unwrap_or(isize::MAX);
        self
    }

    /// Signed bucket count where `-1` means "use the default".
    pub fn raw_bucket_count(mut self, raw: isize) -> Self {
        self.raw_buckets = raw;
        self
    }

    pub fn hasher<H2>(self, hasher: H2) -> TableBuilder<H2, E> {
        TableBuilder {
            raw_buckets: self.raw_buckets,
            hasher,
            equality: self.equality,
        }
    }

    pub fn equality<E2>(self, equality: E2) -> TableBuilder<H, E2> {
        TableBuilder {
            raw_buckets: self.raw_buckets,
            hasher: self.hasher,
            equality,
        }
    }

    pub fn try_build<K, V, C>(self) -> Result<ChainedTable<K, V, H, E, C>, TableError>
    where
        C: Chain<Entry<K, V>>,
    {
        let buckets = BucketCount::from_raw(self.raw_buckets)?;
        ChainedTable::try_with_buckets_and_functions(buckets.get(), self.hasher, self.equality)
    }

    /// Like `try_build`, but panics on an invalid count or allocation failure.
    pub fn build<K, V, C>(self) -> ChainedTable<K, V, H, E, C>
    where
        C: Chain<Entry<K, V>>,
    {
        match self.try_build() {
            Ok(table) => table,
            Err(e) => panic!("chain-table: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{StdEq, StdHash};
    use crate::linked_chain::LinkedChain;

    /// Invariant: `-1` selects 101 buckets; positive counts are literal.
    #[test]
    fn sentinel_selects_default() {
        assert_eq!(BucketCount::from_raw(-1).unwrap(), BucketCount::Default);
        assert_eq!(BucketCount::from_raw(-1).unwrap().get(), 101);
        assert_eq!(BucketCount::from_raw(7).unwrap().get(), 7);
        assert_eq!(BucketCount::default().get(), DEFAULT_BUCKET_COUNT);
    }

    /// Invariant: zero and negative counts other than the sentinel are rejected.
    #[test]
    fn invalid_counts_rejected() {
        assert!(matches!(
            BucketCount::from_raw(0),
            Err(TableError::ZeroBuckets)
        ));
        assert!(matches!(
            BucketCount::from_raw(-2),
            Err(TableError::InvalidBucketCount(-2))
        ));
        assert!(matches!(BucketCount::exact(0), Err(TableError::ZeroBuckets)));
    }

    #[test]
    fn builder_defaults() {
        let t: ChainedTable<String, u8> = TableBuilder::new().build();
        assert_eq!(t.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert!(t.is_empty());
    }

    /// Invariant: builder plumbs custom hasher, equality and chain type through.
    #[test]
    fn builder_with_custom_parts() {
        let mut t: ChainedTable<u64, &str, StdHash, StdEq, LinkedChain<Entry<u64, &str>>> =
            TableBuilder::new()
                .raw_bucket_count(13)
                .hasher(StdHash::default())
                .equality(StdEq)
                .build();
        assert_eq!(t.bucket_count(), 13);
        assert_eq!(t.insert(5, "five"), None);
        assert_eq!(t.get(&5u64), Some(&"five"));
    }

    #[test]
    fn builder_surfaces_invalid_count() {
        let r: Result<ChainedTable<String, u8>, _> =
            TableBuilder::new().raw_bucket_count(-5).try_build();
        assert!(matches!(r, Err(TableError::InvalidBucketCount(-5))));

        let r: Result<ChainedTable<String, u8>, _> = TableBuilder::new().bucket_count(0).try_build();
        assert!(matches!(r, Err(TableError::ZeroBuckets)));
    }
}
