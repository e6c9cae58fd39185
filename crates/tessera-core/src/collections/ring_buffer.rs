//! Fixed-capacity circular buffer

use crate::error::{Error, Result};
use std::fmt;

/// Circular sequence holding the last `capacity` pushed values
///
/// Storage grows up to `capacity` on the first pushes and is then reused in
/// place: `head` marks the slot holding the oldest value, which is the slot
/// the next push overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    capacity: usize,
    head: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create an empty buffer; `capacity` must be at least 1
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity {
                what: "Capacity",
                value: capacity,
            });
        }
        Ok(Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        })
    }

    /// Append `value`, returning the evicted oldest value when full
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.buffer.len() < self.capacity {
            self.buffer.push(value);
            return None;
        }
        let evicted = std::mem::replace(&mut self.buffer[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Contents from oldest to newest
    pub fn to_list(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Most recently pushed value, `None` if nothing was pushed yet
    pub fn latest(&self) -> Option<&T> {
        if self.buffer.is_empty() {
            return None;
        }
        let idx = if self.head == 0 { self.buffer.len() - 1 } else { self.head - 1 };
        self.buffer.get(idx)
    }

    /// Oldest retained value
    pub fn oldest(&self) -> Option<&T> {
        self.buffer.get(self.head)
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.buffer.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Drop all values, keeping the capacity
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.head = 0;
    }
}

impl<T> fmt::Display for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingBuffer(capacity={}, len={})", self.capacity, self.buffer.len())
    }
}
