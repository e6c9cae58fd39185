//! Sorted set backed by a contiguous vector
//!
//! Locating a key is a binary search; inserts and removes shift the tail.
//! Reads dominate writes in the session workload, so the O(n) shift is paid
//! for O(log n) membership and O(log n + k) range queries over a
//! cache-friendly layout.

use std::fmt;

/// Sorted, duplicate-free set of totally ordered keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T> {
    data: Vec<T>,
}

impl<T: Ord> OrderedSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Insert `value`, returning whether it was newly added
    pub fn insert(&mut self, value: T) -> bool {
        match self.data.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.data.insert(pos, value);
                true
            }
        }
    }

    /// Remove `value`, returning whether it was present
    pub fn remove(&mut self, value: &T) -> bool {
        match self.data.binary_search(value) {
            Ok(pos) => {
                self.data.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.data.binary_search(value).is_ok()
    }

    /// Elements `v` with `low <= v <= high`, ascending
    ///
    /// Returns an empty slice when `low > high` or nothing falls inside.
    pub fn range(&self, low: &T, high: &T) -> &[T] {
        if low > high {
            return &[];
        }
        let start = self.data.partition_point(|v| v < low);
        let end = self.data.partition_point(|v| v <= high);
        &self.data[start..end]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Ord + Clone> OrderedSet<T> {
    /// Full contents, ascending
    pub fn to_list(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T: Ord> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut data: Vec<T> = iter.into_iter().collect();
        data.sort_unstable();
        data.dedup();
        Self { data }
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: fmt::Debug> fmt::Display for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.first() {
            Some(first) if self.data.len() > 10 => {
                write!(f, "OrderedSet([{:?}, ... {} items])", first, self.data.len())
            }
            _ => write!(f, "OrderedSet({:?})", self.data),
        }
    }
}
