//! Small containers used by the tree builder and traversals.
//!
//! - [`PriorityQueue`]: binary min-heap ordered by a caller-supplied comparator
//! - [`Stack`]: LIFO work list for iterative tree walks

pub mod priority_queue;
pub mod stack;

pub use priority_queue::PriorityQueue;
pub use stack::Stack;
