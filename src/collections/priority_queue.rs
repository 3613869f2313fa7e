use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A binary min-heap whose order comes from a comparator closure.
///
/// The element for which `cmp` returns `Ordering::Less` against every other
/// element is the one returned by [`pop`](Self::pop). Unlike
/// `std::collections::BinaryHeap` the ordering is not tied to `Ord`, so the
/// same element type can be queued under different rules.
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    data: Vec<T>,
    cmp: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty queue ordered by `cmp`.
    pub fn new(cmp: F) -> Self {
        PriorityQueue {
            data: Vec::new(),
            cmp,
        }
    }

    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        PriorityQueue {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the minimal element without removing it.
    pub fn top(&self) -> Option<&T> {
        self.data.first()
    }

    /// Inserts `value`, restoring the heap property by sifting it up.
    pub fn push(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the minimal element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyQueue`] if the queue holds nothing.
    pub fn pop(&mut self) -> Result<T> {
        if self.data.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let min = self.data.pop().ok_or(Error::EmptyQueue)?;
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.data[a], &self.data[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("data", &self.data)
            .finish()
    }
}
