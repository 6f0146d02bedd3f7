//! Chain: the ordered per-bucket sequence a `ChainedTable` stores entries in.
//!
//! The table only relies on positional access (append at the end, get and
//! remove by position) plus a linear predicate search. Chains must be dense:
//! positions `0..len()` are all occupied, and removing position `i` shifts
//! every later item down by one.
//!
//! Consuming a chain through `IntoIterator` must yield its items front to
//! back in O(len); owning table iteration and rehash rely on it instead of
//! popping position 0 repeatedly.

/// Contract between `ChainedTable` and its per-bucket storage.
pub trait Chain<T>: Default + IntoIterator<Item = T> {
    /// Front-to-back iterator over the items.
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Appends `item` after the last position.
    fn append(&mut self, item: T);

    fn get_at(&self, index: usize) -> Option<&T>;

    fn get_at_mut(&mut self, index: usize) -> Option<&mut T>;

    /// Removes and returns the item at `index`, closing the gap.
    fn remove_at(&mut self, index: usize) -> Option<T>;

    /// Position of the first item (from the front) satisfying `pred`.
    fn find<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool;

    fn len(&self) -> usize;

    fn iter(&self) -> Self::Iter<'_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes items front to back, handing each one to `cleanup`.
    fn drain_with<F>(&mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        core::mem::take(self).into_iter().for_each(cleanup);
    }
}

/// Growable-array chain. Default storage for `ChainedTable`.
#[derive(Debug, Clone)]
pub struct VecChain<T> {
    items: Vec<T>,
}

impl<T> Default for VecChain<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> IntoIterator for VecChain<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> Chain<T> for VecChain<T> {
    type Iter<'a> = core::slice::Iter<'a, T> where T: 'a;

    #[inline]
    fn append(&mut self, item: T) {
        self.items.push(item);
    }

    #[inline]
    fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    fn find<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items.iter()
    }

    fn drain_with<F>(&mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        // Vec::drain yields front to back, same order as repeated remove_at(0).
        self.items.drain(..).for_each(cleanup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: removal closes the gap so later items shift down one position.
    #[test]
    fn remove_at_keeps_chain_dense() {
        let mut c: VecChain<&str> = VecChain::default();
        for s in ["a", "b", "c", "d"] {
            c.append(s);
        }
        assert_eq!(c.remove_at(1), Some("b"));
        assert_eq!(c.len(), 3);
        assert_eq!(c.get_at(0), Some(&"a"));
        assert_eq!(c.get_at(1), Some(&"c"));
        assert_eq!(c.get_at(2), Some(&"d"));
        assert_eq!(c.get_at(3), None);
        assert_eq!(c.remove_at(3), None);
    }

    /// Invariant: `find` reports the first matching position, or `None`.
    #[test]
    fn find_returns_first_match() {
        let mut c: VecChain<(u32, char)> = VecChain::default();
        c.append((1, 'x'));
        c.append((2, 'y'));
        c.append((2, 'z'));
        assert_eq!(c.find(|&(n, _)| n == 2), Some(1));
        assert_eq!(c.find(|&(n, _)| n == 9), None);
    }

    /// Invariant: `drain_with` visits items front to back and leaves the chain empty.
    #[test]
    fn drain_with_visits_in_order() {
        let mut c: VecChain<i32> = VecChain::default();
        for i in 0..5 {
            c.append(i);
        }
        let mut seen = Vec::new();
        c.drain_with(|i| seen.push(i));
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(c.is_empty());
    }

    /// Invariant: consuming the chain yields items in position order.
    #[test]
    fn into_iter_yields_position_order() {
        let mut c: VecChain<u32> = VecChain::default();
        for i in 0..10_000 {
            c.append(i);
        }
        assert!(c.into_iter().eq(0..10_000));
    }

    #[test]
    fn get_at_mut_updates_in_place() {
        let mut c: VecChain<String> = VecChain::default();
        c.append("old".to_string());
        if let Some(s) = c.get_at_mut(0) {
            s.push_str("er");
        }
        assert_eq!(c.get_at(0).map(String::as_str), Some("older"));
    }
}
