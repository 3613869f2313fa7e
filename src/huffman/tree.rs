use super::frequency::FrequencyMap;
use crate::collections::{PriorityQueue, Stack};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node contains a symbol and its frequency.
    Leaf { symbol: u8, freq: u64 },
    /// An internal node owning both children and their combined frequency.
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = Stack::new();
        stack.push(self);
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => count += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(&**right);
                    stack.push(&**left);
                }
            }
        }
        count
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Stack::new();
        stack.push((self, 0usize));
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => height = height.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
        height
    }
}

/// Output of the tree builder.
///
/// `root` is `None` for empty input. When the input holds a single distinct
/// symbol the root is that symbol's leaf; the code generator gives it the
/// one-bit code `0`, which is the same as hanging it on the left of an
/// otherwise empty internal root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffmanNode>,
    merges: usize,
}

impl HuffmanTree {
    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// How many times two nodes were merged under a new parent.
    pub fn merges(&self) -> usize {
        self.merges
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, HuffmanNode::leaf_count)
    }
}

/// A queued subtree together with its tie-break sequence number.
struct Pending {
    node: HuffmanNode,
    seq: usize,
}

/// Lower frequency first; on equal frequency the earlier-queued node wins.
fn pending_order(a: &Pending, b: &Pending) -> Ordering {
    a.node
        .freq()
        .cmp(&b.node.freq())
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Build the Huffman tree given a frequency table.
///
/// Leaves are queued in ascending symbol order and numbered `0..k`; every
/// merged node takes the next number. Nodes are ordered by
/// `(frequency, number)` and the first node popped becomes the left child, so
/// the same input always yields the same tree.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the counts sum past `u64::MAX`.
pub fn build_huffman_tree(freqs: &FrequencyMap) -> Result<HuffmanTree> {
    let mut queue = PriorityQueue::with_capacity(freqs.len(), pending_order);
    for (seq, (symbol, freq)) in freqs.iter().enumerate() {
        queue.push(Pending {
            node: HuffmanNode::Leaf { symbol, freq },
            seq,
        });
    }

    if queue.is_empty() {
        return Ok(HuffmanTree {
            root: None,
            merges: 0,
        });
    }

    let mut next_seq = queue.len();
    let mut merges = 0;
    while queue.len() > 1 {
        let left = queue.pop()?.node;
        let right = queue.pop()?.node;
        let freq = left.freq().checked_add(right.freq()).ok_or_else(|| {
            Error::InvalidInput("combined symbol counts exceed u64".to_string())
        })?;
        let combined = HuffmanNode::Internal {
            freq,
            left: Box::new(left),
            right: Box::new(right),
        };
        queue.push(Pending {
            node: combined,
            seq: next_seq,
        });
        next_seq += 1;
        merges += 1;
    }

    let root = queue.pop()?.node;
    log::debug!(
        "built huffman tree: {} leaves, {} merges, height {}",
        root.leaf_count(),
        merges,
        root.height()
    );
    Ok(HuffmanTree {
        root: Some(root),
        merges,
    })
}
