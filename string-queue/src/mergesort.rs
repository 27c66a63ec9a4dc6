use slab::Slab;

use crate::queue::{Chain, Node};

/// Top-down merge sort over a chain of slab nodes. Only `next` links and the
/// returned chain change; no node is created, dropped or moved.
pub(crate) fn sort<F>(nodes: &mut Slab<Node>, chain: Chain, less: &mut F) -> Chain
where
    F: FnMut(&str, &str) -> bool,
{
    let (Some(head), Some(tail)) = (chain.head, chain.tail) else {
        return chain;
    };
    if chain.len < 2 {
        return chain;
    }

    let (left, right) = split(nodes, head, tail, chain.len);
    let left = sort(nodes, left, less);
    let right = sort(nodes, right, less);

    merge(nodes, left, right, less)
}

/// Cuts the chain after its first `ceil(len / 2)` nodes.
fn split(nodes: &mut Slab<Node>, head: usize, tail: usize, len: usize) -> (Chain, Chain) {
    let left_len = (len + 1) / 2;
    let mut cut = head;
    for _ in 1..left_len {
        match nodes[cut].next {
            Some(next) => cut = next,
            None => break,
        }
    }
    let right_head = nodes[cut].next.take();

    let left = Chain {
        head: Some(head),
        tail: Some(cut),
        len: left_len,
    };
    let right = Chain {
        head: right_head,
        tail: Some(tail),
        len: len - left_len,
    };
    (left, right)
}

fn merge<F>(nodes: &mut Slab<Node>, left: Chain, right: Chain, less: &mut F) -> Chain
where
    F: FnMut(&str, &str) -> bool,
{
    let len = left.len + right.len;
    let mut head = None;
    let mut last: Option<usize> = None;
    let (mut l, mut r) = (left.head, right.head);

    while let (Some(li), Some(ri)) = (l, r) {
        // strict less-than, ties go to the right
        let picked = if less(&nodes[li].value, &nodes[ri].value) {
            l = nodes[li].next;
            li
        } else {
            r = nodes[ri].next;
            ri
        };
        match last {
            Some(previous) => nodes[previous].next = Some(picked),
            None => head = Some(picked),
        }
        last = Some(picked);
    }

    // whatever is left is already sorted and keeps its own tail
    let (rest, tail) = if l.is_some() {
        (l, left.tail)
    } else {
        (r, right.tail)
    };
    match last {
        Some(previous) => nodes[previous].next = rest,
        None => head = rest,
    }

    Chain { head, tail, len }
}
