use std::fmt;

use itertools::Itertools;
use log::trace;
use slab::Slab;

use crate::{error::QueueError, mergesort, order};

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) value: String,
    pub(crate) next: Option<usize>,
}

/// First node, last node and length of a run of linked nodes.
///
/// The queue keeps one of these for its whole chain. Merge sort carves the
/// chain into more of them while it works.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Chain {
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) len: usize,
}

/// A singly-linked queue of owned strings.
///
/// Nodes live in a slab and link to their successor by slot key, so reversal
/// and sorting only rewrite keys.
///
/// ```
/// use string_queue::Queue;
///
/// let mut q = Queue::new();
/// q.insert_back("banana").unwrap();
/// q.insert_back("apple").unwrap();
/// q.insert_front("cherry").unwrap();
/// q.sort();
///
/// assert_eq!(q.pop_front().as_deref(), Some("apple"));
/// assert_eq!(q.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Queue {
    nodes: Slab<Node>,
    chain: Chain,
    limit: Option<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue that refuses to hold more than `max_nodes` elements.
    /// Inserts past the limit fail with [`QueueError::AllocationError`].
    pub fn with_limit(max_nodes: usize) -> Self {
        Self {
            limit: Some(max_nodes),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len
    }

    pub fn is_empty(&self) -> bool {
        self.chain.len == 0
    }

    pub fn front(&self) -> Option<&str> {
        self.chain.head.map(|key| self.nodes[key].value.as_str())
    }

    pub fn insert_front(&mut self, value: &str) -> Result<(), QueueError> {
        let key = self.allocate(value, self.chain.head)?;
        self.chain.head = Some(key);
        if self.chain.tail.is_none() {
            self.chain.tail = Some(key);
        }
        self.chain.len += 1;
        Ok(())
    }

    pub fn insert_back(&mut self, value: &str) -> Result<(), QueueError> {
        let key = self.allocate(value, None)?;
        match self.chain.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.chain.head = Some(key),
        }
        self.chain.tail = Some(key);
        self.chain.len += 1;
        Ok(())
    }

    /// Removes the head element, copying it into `buf` when one is given.
    ///
    /// At most `buf.len() - 1` bytes of the value are copied and a zero byte
    /// terminates them, so the result is terminated even when truncated. A
    /// zero-length buffer receives nothing. On an empty queue nothing is
    /// removed and `buf` is left untouched.
    pub fn remove_front(&mut self, buf: Option<&mut [u8]>) -> Result<(), QueueError> {
        let value = self.pop_front().ok_or(QueueError::InvalidState)?;
        if let Some(buf) = buf {
            copy_terminated(&value, buf);
        }
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<String> {
        let head = self.chain.head?;
        let node = self.nodes.remove(head);
        self.chain.head = node.next;
        if self.chain.head.is_none() {
            self.chain.tail = None;
        }
        self.chain.len -= 1;
        Some(node.value)
    }

    /// Flips the direction of every link without allocating.
    pub fn reverse(&mut self) {
        if self.chain.len < 2 {
            return;
        }
        let mut previous = None;
        let mut cursor = self.chain.head;
        while let Some(key) = cursor {
            cursor = self.nodes[key].next;
            self.nodes[key].next = previous;
            previous = Some(key);
        }
        std::mem::swap(&mut self.chain.head, &mut self.chain.tail);
    }

    /// Sorts by byte-wise string order.
    pub fn sort(&mut self) {
        self.sort_by(order::bytewise);
    }

    /// Merge sorts the chain in place using `less` as a strict less-than test.
    ///
    /// When `less` reports neither element smaller, the one from the later
    /// half of the split is taken first, so equal elements are not kept in
    /// insertion order.
    pub fn sort_by<F>(&mut self, mut less: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        if self.chain.len < 2 {
            return;
        }
        trace!("sorting {} elements", self.chain.len);
        self.chain = mergesort::sort(&mut self.nodes, self.chain, &mut less);
    }

    /// Releases every node, walking the chain from the head.
    pub fn clear(&mut self) {
        let mut cursor = self.chain.head.take();
        while let Some(key) = cursor {
            cursor = self.nodes.remove(key).next;
        }
        self.chain = Chain::default();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            next: self.chain.head,
            remaining: self.chain.len,
        }
    }

    fn allocate(&mut self, value: &str, next: Option<usize>) -> Result<usize, QueueError> {
        if self.limit.is_some_and(|limit| self.nodes.len() >= limit) {
            return Err(QueueError::AllocationError);
        }
        // the slot is only taken once the entry is filled
        let entry = self.nodes.vacant_entry();
        let mut copy = String::new();
        copy.try_reserve_exact(value.len())
            .map_err(|_| QueueError::AllocationError)?;
        copy.push_str(value);

        let key = entry.key();
        entry.insert(Node { value: copy, next });
        Ok(key)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.chain.len == 0, self.chain.head.is_none());
        assert_eq!(self.chain.len == 0, self.chain.tail.is_none());
        assert_eq!(self.nodes.len(), self.chain.len);

        let mut cursor = self.chain.head;
        let mut last = None;
        for _ in 0..self.chain.len {
            let key = cursor.expect("chain ended before its length");
            last = Some(key);
            cursor = self.nodes[key].next;
        }
        assert_eq!(cursor, None);
        assert_eq!(last, self.chain.tail);
    }
}

fn copy_terminated(value: &str, buf: &mut [u8]) {
    let Some(room) = buf.len().checked_sub(1) else {
        return;
    };
    let count = room.min(value.len());
    buf[..count].copy_from_slice(&value.as_bytes()[..count]);
    buf[count] = 0;
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().join(" "))
    }
}

/// Iterator over the values of a [`Queue`], head first.
pub struct Iter<'a> {
    nodes: &'a Slab<Node>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.next;
        self.remaining -= 1;
        Some(node.value.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::Queue;
    use crate::error::QueueError;

    fn queue_of(values: &[&str]) -> Queue {
        let mut q = Queue::new();
        for value in values {
            q.insert_back(value).unwrap();
        }
        q
    }

    #[test]
    fn test_insert_back_is_fifo() {
        let mut q = queue_of(&["a", "b", "c"]);
        q.assert_invariants();
        assert_eq!(q.pop_front().as_deref(), Some("a"));
        assert_eq!(q.pop_front().as_deref(), Some("b"));
        assert_eq!(q.pop_front().as_deref(), Some("c"));
        assert_eq!(q.pop_front(), None);
        q.assert_invariants();
    }

    #[test]
    fn test_insert_front_is_lifo() {
        let mut q = Queue::new();
        q.insert_front("a").unwrap();
        q.insert_front("b").unwrap();
        q.assert_invariants();
        assert_eq!(q.front(), Some("b"));
        assert_eq!(q.pop_front().as_deref(), Some("b"));
        assert_eq!(q.pop_front().as_deref(), Some("a"));
    }

    #[test]
    fn test_mixed_inserts_keep_tail() {
        let mut q = Queue::new();
        q.insert_front("b").unwrap();
        q.insert_back("c").unwrap();
        q.insert_front("a").unwrap();
        q.insert_back("d").unwrap();
        q.assert_invariants();
        assert_eq!(q.iter().collect_vec(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_inserted_value_is_a_copy() {
        let mut value = String::from("mutable");
        let mut q = Queue::new();
        q.insert_back(&value).unwrap();
        value.push_str(" changed");
        assert_eq!(q.front(), Some("mutable"));
    }

    #[rstest]
    #[case("hello", 3, b"he\0".to_vec())]
    #[case("hello", 6, b"hello\0".to_vec())]
    #[case("hello", 1, b"\0".to_vec())]
    #[case("", 4, b"\0\xff\xff\xff".to_vec())]
    #[case("hello", 10, b"hello\0\xff\xff\xff\xff".to_vec())]
    fn test_remove_front_truncates(
        #[case] value: &str,
        #[case] capacity: usize,
        #[case] expected: Vec<u8>,
    ) {
        let mut q = queue_of(&[value]);
        let mut buf = vec![0xff; capacity];
        q.remove_front(Some(&mut buf)).unwrap();
        assert_eq!(buf, expected);
        assert!(q.is_empty());
        q.assert_invariants();
    }

    #[test]
    fn test_remove_front_with_empty_buffer() {
        let mut q = queue_of(&["x"]);
        let mut buf: [u8; 0] = [];
        q.remove_front(Some(&mut buf)).unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn test_remove_front_on_empty_leaves_buffer() {
        let mut q = Queue::new();
        let mut buf = [7u8; 4];
        assert_eq!(q.remove_front(Some(&mut buf)), Err(QueueError::InvalidState));
        assert_eq!(buf, [7u8; 4]);
        assert_eq!(q.remove_front(None), Err(QueueError::InvalidState));
    }

    #[test]
    fn test_limit_rejects_insert_without_mutation() {
        let mut q = Queue::with_limit(2);
        q.insert_back("a").unwrap();
        q.insert_front("b").unwrap();
        assert_eq!(q.insert_back("c"), Err(QueueError::AllocationError));
        assert_eq!(q.insert_front("c"), Err(QueueError::AllocationError));
        q.assert_invariants();
        assert_eq!(q.iter().collect_vec(), ["b", "a"]);

        q.pop_front();
        q.insert_back("c").unwrap();
        assert_eq!(q.iter().collect_vec(), ["a", "c"]);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["only"])]
    #[case(&["a", "b"])]
    #[case(&["a", "b", "c", "d", "e"])]
    fn test_reverse(#[case] values: &[&str]) {
        let mut q = queue_of(values);
        q.reverse();
        q.assert_invariants();
        let expected = values.iter().rev().copied().collect_vec();
        assert_eq!(q.iter().collect_vec(), expected);

        q.reverse();
        assert_eq!(q.iter().collect_vec(), values);
    }

    #[test]
    fn test_reverse_then_append() {
        let mut q = queue_of(&["a", "b", "c"]);
        q.reverse();
        q.insert_back("z").unwrap();
        q.assert_invariants();
        assert_eq!(q.iter().collect_vec(), ["c", "b", "a", "z"]);
    }

    #[test]
    fn test_sort_keeps_nodes() {
        let mut q = queue_of(&["pear", "fig", "apple", "kiwi", "date", "fig", "banana"]);
        q.sort();
        q.assert_invariants();
        assert_eq!(
            q.iter().collect_vec(),
            ["apple", "banana", "date", "fig", "fig", "kiwi", "pear"]
        );

        q.insert_back("zucchini").unwrap();
        q.assert_invariants();
        assert_eq!(q.len(), 8);
    }

    #[test]
    fn test_sort_by_reverse_order() {
        let mut q = queue_of(&["b", "c", "a"]);
        q.sort_by(|a, b| a > b);
        assert_eq!(q.iter().collect_vec(), ["c", "b", "a"]);
    }

    #[test]
    fn test_sort_takes_later_half_first_on_ties() {
        // compares only the first byte, so "a1" and "a2" tie
        let mut q = queue_of(&["a1", "a2"]);
        q.sort_by(|a, b| a.as_bytes()[0] < b.as_bytes()[0]);
        assert_eq!(q.iter().collect_vec(), ["a2", "a1"]);
    }

    #[test]
    fn test_clear() {
        let mut q = queue_of(&["a", "b", "c"]);
        q.clear();
        q.assert_invariants();
        assert!(q.is_empty());
        q.insert_front("d").unwrap();
        assert_eq!(q.to_string(), "[d]");
    }

    #[test]
    fn test_display() {
        assert_eq!(Queue::new().to_string(), "[]");
        assert_eq!(queue_of(&["a", "b"]).to_string(), "[a b]");
    }
}
