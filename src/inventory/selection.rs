//! Choosing a size class for a new package
//!
//! The preferred class is the one with the most virtual capacity, meaning the
//! most free lockers in itself plus every class that fits inside it. Among
//! classes with equal virtual capacity the smallest volume wins, and any
//! remaining tie goes to the lowest class id.

use super::size::SizeSpec;
use super::size_class::{SizeClass, SizeClassId};
use crate::error::{Error, Result};
use std::cmp::{Ordering, Reverse};

/// Inventory-aware ordering of two size classes.
///
/// Returns true when `a` should be preferred over `b`.
pub fn before(a: &SizeClass, b: &SizeClass) -> bool {
    preference(a) < preference(b)
}

fn preference(c: &SizeClass) -> (Reverse<usize>, i128) {
    (Reverse(c.virtual_capacity()), c.size.exact_volume())
}

/// Total order used to pick a class: `before`, then lowest id
fn rank(a: &SizeClass, b: &SizeClass) -> Ordering {
    preference(a)
        .cmp(&preference(b))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the most suitable class for a normalized package size.
///
/// Only classes that can hold the package and still have a free locker are
/// considered. Fails with [`Error::NoAvailableLocker`] when there are none,
/// whether because nothing is big enough or because every class that is big
/// enough is currently full.
///
/// Virtual capacity counts the free lockers of every class nested inside a
/// class, so an enclosing class outranks the classes it contains. With
/// 4x1x1 (1 free), 2x2x2 (100 free) and 4x4x4 (1 free), a 2x1x1 package goes
/// to 4x4x4 (virtual capacity 102), not to the plentiful 2x2x2 (100).
pub fn most_suitable<'a, I>(classes: I, package_size: &SizeSpec) -> Result<SizeClassId>
where
    I: IntoIterator<Item = &'a SizeClass>,
{
    classes
        .into_iter()
        .filter(|c| c.can_fit(package_size) && !c.is_full())
        .min_by(|a, b| rank(a, b))
        .map(|c| c.id)
        .ok_or(Error::NoAvailableLocker(*package_size))
}
