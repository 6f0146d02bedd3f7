//! LinkedChain: a singly linked chain whose nodes live in a generational
//! arena instead of individual heap boxes.
//!
//! Links are `slotmap` keys, so a node is reachable only through the chain's
//! own arena and a stale key can never alias a node inserted later. Positional
//! operations walk from the head and are O(position); appends are O(1)
//! through the cached tail.

use crate::chain::Chain;
use slotmap::{DefaultKey, SlotMap};

type Arena<T> = SlotMap<DefaultKey, Node<T>>;

#[derive(Debug, Clone)]
struct Node<T> {
    item: T,
    next: Option<DefaultKey>,
}

/// The arena is created by the first `append`, so an empty chain owns no
/// heap memory and a table's eagerly built buckets allocate nothing beyond
/// the bucket array itself.
#[derive(Debug, Clone)]
pub struct LinkedChain<T> {
    nodes: Option<Arena<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> Default for LinkedChain<T> {
    fn default() -> Self {
        Self {
            nodes: None,
            head: None,
            tail: None,
        }
    }
}

/// Front-to-back iterator over a `LinkedChain`.
pub struct Iter<'a, T> {
    nodes: Option<&'a Arena<T>>,
    cursor: Option<DefaultKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes?.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.item)
    }
}

/// Owning iterator; frees each node as it follows the links.
pub struct IntoIter<T> {
    nodes: Option<Arena<T>>,
    cursor: Option<DefaultKey>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.as_mut()?.remove(self.cursor?)?;
        self.cursor = node.next;
        Some(node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.nodes.as_ref().map_or(0, SlotMap::len);
        (n, Some(n))
    }
}

impl<T> IntoIterator for LinkedChain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            nodes: self.nodes,
            cursor: self.head,
        }
    }
}

impl<T> LinkedChain<T> {
    fn key_at(&self, index: usize) -> Option<DefaultKey> {
        let nodes = self.nodes.as_ref()?;
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = nodes.get(cursor?)?.next;
        }
        cursor
    }
}

impl<T> Chain<T> for LinkedChain<T> {
    type Iter<'a> = Iter<'a, T> where T: 'a;

    fn append(&mut self, item: T) {
        let nodes = self.nodes.get_or_insert_with(SlotMap::with_key);
        let k = nodes.insert(Node { item, next: None });
        match self.tail.and_then(|t| nodes.get_mut(t)) {
            Some(last) => last.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        let k = self.key_at(index)?;
        self.nodes.as_ref()?.get(k).map(|n| &n.item)
    }

    fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        let k = self.key_at(index)?;
        self.nodes.as_mut()?.get_mut(k).map(|n| &mut n.item)
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let (prev, k) = if index == 0 {
            (None, self.head?)
        } else {
            let p = self.key_at(index - 1)?;
            (Some(p), self.nodes.as_ref()?.get(p)?.next?)
        };

        // Unlink before freeing the slot.
        let nodes = self.nodes.as_mut()?;
        let removed = nodes.remove(k)?;
        match prev.and_then(|p| nodes.get_mut(p)) {
            Some(p) => p.next = removed.next,
            None => self.head = removed.next,
        }
        if self.tail == Some(k) {
            self.tail = prev;
        }
        Some(removed.item)
    }

    fn find<P>(&self, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|item| pred(item))
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.as_ref().map_or(0, SlotMap::len)
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter {
            nodes: self.nodes.as_ref(),
            cursor: self.head,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(items: &[i32]) -> LinkedChain<i32> {
        let mut c = LinkedChain::default();
        for &i in items {
            c.append(i);
        }
        c
    }

    /// Invariant: positions follow append order.
    #[test]
    fn append_then_get_in_order() {
        let c = chain_of(&[10, 20, 30]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.get_at(0), Some(&10));
        assert_eq!(c.get_at(2), Some(&30));
        assert_eq!(c.get_at(3), None);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    /// Invariant: removing the head, a middle node or the tail relinks the
    /// remaining nodes; appends after a tail removal still land at the end.
    #[test]
    fn remove_relinks_head_middle_and_tail() {
        let mut c = chain_of(&[1, 2, 3, 4]);
        assert_eq!(c.remove_at(0), Some(1));
        assert_eq!(c.remove_at(1), Some(3));
        assert_eq!(c.remove_at(1), Some(4));
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![2]);

        c.append(5);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(c.remove_at(9), None);
    }

    /// Invariant: emptying the chain resets head and tail; it is reusable.
    #[test]
    fn empty_after_removing_everything() {
        let mut c = chain_of(&[7, 8]);
        assert_eq!(c.remove_at(1), Some(8));
        assert_eq!(c.remove_at(0), Some(7));
        assert!(c.is_empty());
        assert_eq!(c.remove_at(0), None);
        c.append(9);
        assert_eq!(c.get_at(0), Some(&9));
    }

    #[test]
    fn find_and_mutate() {
        let mut c = chain_of(&[3, 6, 9]);
        assert_eq!(c.find(|&x| x % 2 == 0), Some(1));
        assert_eq!(c.find(|&x| x > 100), None);
        if let Some(x) = c.get_at_mut(2) {
            *x = 12;
        }
        assert_eq!(c.find(|&x| x == 12), Some(2));
    }

    /// Invariant: the provided `drain_with` visits items front to back.
    #[test]
    fn drain_with_front_to_back() {
        let mut c = chain_of(&[4, 5, 6]);
        let mut seen = Vec::new();
        c.drain_with(|x| seen.push(x));
        assert_eq!(seen, vec![4, 5, 6]);
        assert!(c.is_empty());
    }

    /// Invariant: an empty chain has no arena; the first append creates it and
    /// later removals keep it for reuse.
    #[test]
    fn arena_created_on_first_append() {
        let mut c: LinkedChain<i32> = LinkedChain::default();
        assert!(c.nodes.is_none());
        assert_eq!(c.len(), 0);
        assert_eq!(c.get_at(0), None);
        assert_eq!(c.get_at_mut(0), None);
        assert_eq!(c.remove_at(0), None);
        assert_eq!(c.find(|_| true), None);
        assert_eq!(c.iter().count(), 0);
        assert_eq!(c.clone().into_iter().count(), 0);
        assert!(c.nodes.is_none());

        c.append(1);
        assert!(c.nodes.is_some());
        assert_eq!(c.remove_at(0), Some(1));
        assert!(c.is_empty());
        assert!(c.nodes.is_some());
    }

    /// Invariant: consuming the chain follows the links front to back, also
    /// after removals have left holes in the arena.
    #[test]
    fn into_iter_follows_links() {
        let mut c = chain_of(&[1, 2, 3, 4, 5]);
        assert_eq!(c.remove_at(0), Some(1));
        assert_eq!(c.remove_at(1), Some(3));
        c.append(6);
        let it = c.into_iter();
        assert_eq!(it.size_hint(), (4, Some(4)));
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 4, 5, 6]);

        let long: LinkedChain<u32> = {
            let mut c = LinkedChain::default();
            (0..10_000).for_each(|i| c.append(i));
            c
        };
        assert!(long.into_iter().eq(0..10_000));
    }
}
