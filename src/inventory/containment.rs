//! Containment relation between size classes
//!
//! Every comparable pair gets a direct edge, not just the covering ones, so
//! summing over `smaller_than(x)` already visits every class that fits inside `x`.
//!
//! ```text
//! 5x5x5 ──┬─→ 5x1x1 ──→ 1x1x1
//!         └────────────→ 1x1x1
//! 4x4x1      (incomparable with 5x1x1)
//! ```

use super::size::SizeSpec;
use super::size_class::SizeClassId;

/// Immutable strict partial order of "fits entirely inside" over size classes
#[derive(Debug, Clone, Default)]
pub struct ContainmentRelation {
    /// `smaller[i]`: classes strictly contained by class `i`
    smaller: Vec<Vec<SizeClassId>>,
    /// `larger[i]`: classes that strictly contain class `i`
    larger: Vec<Vec<SizeClassId>>,
}

impl ContainmentRelation {
    /// Build the relation over normalized sizes, where `sizes[i]` belongs to class `i`.
    ///
    /// O(n²) in the number of distinct sizes.
    pub fn build(sizes: &[SizeSpec]) -> Self {
        let n = sizes.len();
        let mut smaller = vec![Vec::new(); n];
        let mut larger = vec![Vec::new(); n];

        for (i, s1) in sizes.iter().enumerate() {
            for (j, s2) in sizes.iter().enumerate().skip(i + 1) {
                let (a, b) = (SizeClassId(i as u32), SizeClassId(j as u32));
                match (s1.contains(s2), s2.contains(s1)) {
                    (true, false) => {
                        smaller[i].push(b);
                        larger[j].push(a);
                    }
                    (false, true) => {
                        smaller[j].push(a);
                        larger[i].push(b);
                    }
                    // Equal sizes are merged before this point; anything else is incomparable
                    _ => {}
                }
            }
        }

        Self { smaller, larger }
    }

    /// Number of classes covered by the relation
    pub fn len(&self) -> usize {
        self.smaller.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smaller.is_empty()
    }

    /// Classes that fit strictly inside `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the relation.
    pub fn smaller_than(&self, id: SizeClassId) -> &[SizeClassId] {
        &self.smaller[id.index()]
    }

    /// Classes that strictly contain `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the relation.
    pub fn larger_than(&self, id: SizeClassId) -> &[SizeClassId] {
        &self.larger[id.index()]
    }

    /// Whether class `a` strictly contains class `b`
    pub fn strictly_contains(&self, a: SizeClassId, b: SizeClassId) -> bool {
        self.smaller
            .get(a.index())
            .is_some_and(|s| s.contains(&b))
    }
}
