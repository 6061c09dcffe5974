//! Box dimensions for lockers and packages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned dimensions of a locker or package.
///
/// Raw values may be negative or in any order. Call [`SizeSpec::normalize`]
/// before comparing two sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeSpec {
    pub length: i32,
    pub width: i32,
    pub height: i32,
}

impl SizeSpec {
    /// Create a size from raw dimensions
    pub const fn new(length: i32, width: i32, height: i32) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Canonical form: every dimension non-negative, sorted descending.
    ///
    /// `i32::MIN` has no positive counterpart and is left as is.
    pub fn normalize(self) -> Self {
        let mut l = self.length.wrapping_abs();
        let mut w = self.width.wrapping_abs();
        let mut h = self.height.wrapping_abs();

        // 3-element exchange network
        if h > w {
            std::mem::swap(&mut h, &mut w);
        }
        if w > l {
            std::mem::swap(&mut w, &mut l);
        }
        if h > w {
            std::mem::swap(&mut h, &mut w);
        }

        Self::new(l, w, h)
    }

    /// Whether this size is already in canonical form
    pub fn is_normalized(&self) -> bool {
        self.height >= 0 && self.width >= self.height && self.length >= self.width
    }

    /// Product of the three dimensions.
    ///
    /// Sign is preserved, so a negative result means the size was never normalized.
    /// Wraps on overflow; use [`SizeSpec::exact_volume`] when ordering by volume.
    pub fn volume(&self) -> i64 {
        (self.length as i64)
            .wrapping_mul(self.width as i64)
            .wrapping_mul(self.height as i64)
    }

    /// Product of the three dimensions without overflow
    pub fn exact_volume(&self) -> i128 {
        self.length as i128 * self.width as i128 * self.height as i128
    }

    /// Per-axis containment test. Both sizes must be normalized.
    pub fn contains(&self, other: &SizeSpec) -> bool {
        self.length >= other.length && self.width >= other.width && self.height >= other.height
    }
}

impl From<(i32, i32, i32)> for SizeSpec {
    fn from((length, width, height): (i32, i32, i32)) -> Self {
        Self::new(length, width, height)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}
