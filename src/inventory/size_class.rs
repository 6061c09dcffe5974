//! Size class management for the locker inventory

use super::size::SizeSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier of a distinct locker size, assigned in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SizeClassId(pub u32);

impl SizeClassId {
    /// Position of this class in the inventory's control table
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SizeClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class-{}", self.0)
    }
}

/// Control block for all lockers sharing one normalized size
///
/// Free lockers are kept as a stack of indices into the inventory's locker array.
#[derive(Debug, Clone)]
pub struct SizeClass {
    /// Identifier of this class
    pub id: SizeClassId,
    /// Normalized size of every locker in this class
    pub size: SizeSpec,
    /// Free lockers (indices into the inventory)
    free: Vec<usize>,
    /// Free lockers in this class plus every strictly smaller class
    virtual_capacity: usize,
}

impl SizeClass {
    /// Create an empty size class with room for `capacity` lockers
    pub fn new(id: SizeClassId, size: SizeSpec, capacity: usize) -> Self {
        Self {
            id,
            size,
            free: Vec::with_capacity(capacity),
            virtual_capacity: 0,
        }
    }

    /// Take the most recently freed locker, if any
    pub fn pop_free(&mut self) -> Option<usize> {
        self.free.pop()
    }

    /// Locker that the next `pop_free` would return
    pub fn peek_free(&self) -> Option<usize> {
        self.free.last().copied()
    }

    /// Return a locker to this class
    pub fn push_free(&mut self, index: usize) {
        self.free.push(index);
    }

    /// Free locker indices, in stack order
    pub fn free_lockers(&self) -> &[usize] {
        &self.free
    }

    /// Number of free lockers in this class
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// True when no locker of this class is free
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Check if a normalized package size fits in this class
    pub fn can_fit(&self, size: &SizeSpec) -> bool {
        self.size.contains(size)
    }

    pub fn virtual_capacity(&self) -> usize {
        self.virtual_capacity
    }

    pub(crate) fn set_virtual_capacity(&mut self, value: usize) {
        self.virtual_capacity = value;
    }

    /// Apply a signed change to the virtual capacity.
    ///
    /// # Panics
    ///
    /// Panics if the result would be negative. That can only happen when
    /// the free-list bookkeeping is already corrupt.
    pub fn adjust_virtual_capacity(&mut self, delta: isize) {
        self.virtual_capacity = self
            .virtual_capacity
            .checked_add_signed(delta)
            .unwrap_or_else(|| {
                panic!(
                    "virtual capacity of {} would underflow ({} {:+})",
                    self.id, self.virtual_capacity, delta
                )
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(capacity: usize) -> SizeClass {
        SizeClass::new(SizeClassId(0), SizeSpec::new(5, 5, 5), capacity)
    }

    #[test]
    fn test_full_tracks_free_list() {
        let mut sc = class(1);
        assert!(sc.is_full());

        sc.push_free(1);
        assert!(!sc.is_full());
        assert_eq!(sc.free_count(), 1);

        assert_eq!(sc.pop_free(), Some(1));
        assert!(sc.is_full());
        assert_eq!(sc.pop_free(), None);
    }

    #[test]
    fn test_free_list_is_a_stack() {
        let mut sc = class(3);
        sc.push_free(0);
        sc.push_free(1);
        sc.push_free(2);

        assert_eq!(sc.peek_free(), Some(2));
        assert_eq!(sc.pop_free(), Some(2));
        assert_eq!(sc.pop_free(), Some(1));

        // Freed lockers are handed out first
        sc.push_free(2);
        assert_eq!(sc.pop_free(), Some(2));
    }

    #[test]
    fn test_can_fit() {
        let sc = class(0);
        assert!(sc.can_fit(&SizeSpec::new(5, 5, 5)));
        assert!(sc.can_fit(&SizeSpec::new(5, 1, 1)));
        assert!(!sc.can_fit(&SizeSpec::new(6, 1, 1)));
    }

    #[test]
    fn test_adjust_virtual_capacity() {
        let mut sc = class(0);
        sc.set_virtual_capacity(3);
        sc.adjust_virtual_capacity(-1);
        assert_eq!(sc.virtual_capacity(), 2);
        sc.adjust_virtual_capacity(2);
        assert_eq!(sc.virtual_capacity(), 4);
    }

    #[test]
    #[should_panic(expected = "would underflow")]
    fn test_adjust_virtual_capacity_underflow_panics() {
        let mut sc = class(0);
        sc.adjust_virtual_capacity(-1);
    }
}
